//! Configuration.

use criterium_common::types::QueryLanguage;
use serde::{Deserialize, Serialize};

/// Compiler and session configuration.
///
/// Passed explicitly to [`Compiler`](crate::Compiler) and
/// [`Session`](crate::Session); there is no global default to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language used when a query does not name one and the executor has
    /// no preference.
    pub default_language: QueryLanguage,
    /// Log every compiled statement at INFO level.
    pub query_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: QueryLanguage::Sql2,
            query_logging: false,
        }
    }
}

impl Config {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback language.
    ///
    /// [`QueryLanguage::Unspecified`] restores the built-in fallback,
    /// JCR-SQL2.
    #[must_use]
    pub fn with_default_language(mut self, language: QueryLanguage) -> Self {
        self.default_language = language.or(QueryLanguage::Sql2);
        self
    }

    /// Enables or disables INFO logging of compiled statements.
    #[must_use]
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.query_logging = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.default_language, QueryLanguage::Sql2);
        assert!(!config.query_logging);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_default_language(QueryLanguage::XPath)
            .with_query_logging(true);
        assert_eq!(config.default_language, QueryLanguage::XPath);
        assert!(config.query_logging);

        let reset = config.with_default_language(QueryLanguage::Unspecified);
        assert_eq!(reset.default_language, QueryLanguage::Sql2);
    }
}
