//! Match modes for pattern-match criteria.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Anchoring policy for a pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The whole value equals the literal.
    Exact,
    /// The value starts with the literal.
    Start,
    /// The value ends with the literal.
    End,
    /// The literal occurs anywhere in the value.
    Anywhere,
}

impl MatchMode {
    /// Anchors a literal according to this mode.
    ///
    /// The result is grammar independent; backends turn it into text with
    /// [`LikePattern::render`].
    #[must_use]
    pub fn resolve(self, literal: &str) -> LikePattern {
        let (leading, trailing) = match self {
            MatchMode::Exact => (false, false),
            MatchMode::Start => (false, true),
            MatchMode::End => (true, false),
            MatchMode::Anywhere => (true, true),
        };
        LikePattern {
            literal: literal.to_string(),
            leading,
            trailing,
        }
    }

    /// Returns the mode's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MatchMode::Exact => "EXACT",
            MatchMode::Start => "START",
            MatchMode::End => "END",
            MatchMode::Anywhere => "ANYWHERE",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal anchored with "any sequence" wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LikePattern {
    literal: String,
    leading: bool,
    trailing: bool,
}

impl LikePattern {
    /// The canonical any-sequence wildcard.
    pub const WILDCARD: char = '%';
    /// The canonical single-character wildcard.
    pub const SINGLE: char = '_';
    /// The canonical escape character.
    pub const ESCAPE: char = '\\';

    /// Returns the unescaped literal.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns true if any prefix is accepted.
    #[must_use]
    pub fn leading_wildcard(&self) -> bool {
        self.leading
    }

    /// Returns true if any suffix is accepted.
    #[must_use]
    pub fn trailing_wildcard(&self) -> bool {
        self.trailing
    }

    /// Renders the pattern with a grammar's wildcard tokens.
    ///
    /// Occurrences of either wildcard token or of the escape character in
    /// the literal are escaped, so the literal only ever matches itself.
    #[must_use]
    pub fn render(&self, wildcard: char, single: char, escape: char) -> String {
        let mut out = String::with_capacity(self.literal.len() + 2);
        if self.leading {
            out.push(wildcard);
        }
        for c in self.literal.chars() {
            if c == wildcard || c == single || c == escape {
                out.push(escape);
            }
            out.push(c);
        }
        if self.trailing {
            out.push(wildcard);
        }
        out
    }
}

impl fmt::Display for LikePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Self::WILDCARD, Self::SINGLE, Self::ESCAPE))
    }
}

/// Resolves a match mode and literal to the canonical pattern string.
#[must_use]
pub fn resolve(mode: MatchMode, literal: &str) -> String {
    mode.resolve(literal).to_string()
}
