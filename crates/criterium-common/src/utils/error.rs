//! Error types for Criterium.
//!
//! One taxonomy covers every layer: construction of criteria, rendering to
//! a target grammar, result metadata, and failures surfaced by an executor.

use thiserror::Error;

use crate::types::QueryLanguage;

/// Result type alias for Criterium operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A criterion was constructed from malformed input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A criterion has no rendering in the requested grammar.
    #[error("{criterion} cannot be expressed in {language}")]
    UnsupportedInTarget {
        /// The offending criterion, as rendered by its `Display`.
        criterion: String,
        /// The grammar that was asked for.
        language: QueryLanguage,
    },

    /// Metadata was requested before its precondition holds.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// The executor failed. Passed through unchanged.
    #[error("query execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wraps an executor failure.
    pub fn execution(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Execution(err.into())
    }

    /// Builds an [`Error::UnsupportedInTarget`] for a criterion.
    pub fn unsupported(criterion: impl ToString, language: QueryLanguage) -> Self {
        Error::UnsupportedInTarget {
            criterion: criterion.to_string(),
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_node_and_grammar() {
        let err = Error::unsupported("isDescendantOf('/a')", QueryLanguage::XPath);
        assert_eq!(
            err.to_string(),
            "isDescendantOf('/a') cannot be expressed in xpath"
        );
    }

    #[test]
    fn test_execution_keeps_source() {
        let err = Error::execution("repository unavailable");
        assert!(matches!(err, Error::Execution(_)));
        assert_eq!(
            err.to_string(),
            "query execution failed: repository unavailable"
        );
    }
}
