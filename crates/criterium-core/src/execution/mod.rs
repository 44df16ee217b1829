//! The boundary to whatever actually runs a query.
//!
//! The compiler never executes anything. An [`Executor`] takes a
//! [`QueryDescriptor`] and returns a [`Cursor`] over [`Row`]s; the
//! [`PagedResult`] wrapper sits on top and provides paging, lazy counting,
//! and re-iteration.
//!
//! Rows are passed through untouched. The typed accessors on [`Row`] are
//! conveniences over [`Row::property`], not conversions.

pub mod paged;

pub use paged::{Items, PagedResult};

use chrono::{DateTime, Utc};
use criterium_common::types::{QueryLanguage, Value};
use criterium_common::utils::error::Result;

use crate::query::QueryDescriptor;

/// One matching node.
pub trait Row {
    /// The node's absolute path.
    fn path(&self) -> &str;

    /// The node's primary type.
    fn primary_type(&self) -> &str;

    /// The relevance score. Always defined; its scale is executor specific.
    fn score(&self) -> f64;

    /// Reads a property, or `None` if the node does not have it.
    fn property(&self, name: &str) -> Option<Value>;

    /// Reads a string property.
    fn string(&self, name: &str) -> Option<String> {
        self.property(name)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Reads a long property.
    fn long(&self, name: &str) -> Option<i64> {
        self.property(name).and_then(|v| v.as_long())
    }

    /// Reads a numeric property as a double.
    fn double(&self, name: &str) -> Option<f64> {
        self.property(name).and_then(|v| v.as_double())
    }

    /// Reads a boolean property.
    fn boolean(&self, name: &str) -> Option<bool> {
        self.property(name).and_then(|v| v.as_boolean())
    }

    /// Reads a date property.
    fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        self.property(name).and_then(|v| v.as_date())
    }
}

/// A forward-only stream of rows.
pub trait Cursor<R: Row>: Iterator<Item = Result<R>> {
    /// The total number of matches, if the executor knows it without
    /// iterating. Counts all matches, not just the current page.
    fn size(&self) -> Option<u64> {
        None
    }
}

/// Runs compiled queries.
pub trait Executor {
    /// The row type.
    type Row: Row;
    /// The cursor type.
    type Cursor: Cursor<Self::Row>;

    /// Runs a query.
    ///
    /// # Errors
    ///
    /// Failures should be wrapped with
    /// [`Error::execution`](criterium_common::utils::error::Error::execution);
    /// callers pass them through unchanged.
    fn execute(&self, query: &QueryDescriptor) -> Result<Self::Cursor>;

    /// Returns true if [`execute`](Self::execute) honours the descriptor's
    /// offset and limit. Otherwise the paged wrapper skips and truncates
    /// rows itself.
    fn applies_paging(&self) -> bool {
        true
    }

    /// Returns true if the same descriptor may be executed again to obtain
    /// a fresh cursor.
    fn supports_requery(&self) -> bool {
        true
    }

    /// The language this executor would pick for an unspecified query.
    fn preferred_language(&self) -> Option<QueryLanguage> {
        None
    }
}
