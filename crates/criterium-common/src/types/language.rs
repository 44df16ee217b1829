//! Target query languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::Error;

/// The grammar a query is rendered in.
///
/// `Unspecified` is a real value, not an absent one: it records that the
/// caller left the choice to the executor or the configured default.
/// Descriptors keep the requested language next to the resolved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryLanguage {
    /// The path-oriented JCR XPath grammar.
    #[serde(rename = "xpath", alias = "XPATH")]
    XPath,
    /// The SQL-like JCR-SQL2 grammar.
    #[serde(alias = "JCR-SQL2")]
    Sql2,
    /// Let the executor or the configuration pick.
    #[default]
    Unspecified,
}

impl QueryLanguage {
    /// Returns the canonical name of the language.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QueryLanguage::XPath => "xpath",
            QueryLanguage::Sql2 => "JCR-SQL2",
            QueryLanguage::Unspecified => "unspecified",
        }
    }

    /// Returns true unless this is [`QueryLanguage::Unspecified`].
    #[must_use]
    pub fn is_specified(&self) -> bool {
        !matches!(self, QueryLanguage::Unspecified)
    }

    /// Returns this language, or `fallback` when unspecified.
    #[must_use]
    pub fn or(self, fallback: QueryLanguage) -> QueryLanguage {
        if self.is_specified() { self } else { fallback }
    }
}

impl fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryLanguage {
    type Err = Error;

    /// Parses the names used by content repositories; the empty string
    /// means unspecified.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "unspecified" => Ok(QueryLanguage::Unspecified),
            "xpath" | "XPATH" => Ok(QueryLanguage::XPath),
            "sql2" | "SQL2" | "JCR-SQL2" => Ok(QueryLanguage::Sql2),
            other => Err(Error::InvalidArgument(format!(
                "unknown query language: {other}"
            ))),
        }
    }
}
