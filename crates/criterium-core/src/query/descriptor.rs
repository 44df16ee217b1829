//! The compiled query artifact.

use std::fmt;

use criterium_common::types::QueryLanguage;
use serde::{Deserialize, Serialize};

use crate::criterion::{Criterion, Junction, OrderSpec};

/// A rendered query plus the metadata needed to run and page it.
///
/// Descriptors are values: the `with_*` methods return modified copies
/// and nothing mutates one in place. The statement is the only part an
/// external executor needs; the source criterion is kept so the count
/// query can be re-rendered and so interpreting executors can evaluate
/// it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    requested_language: QueryLanguage,
    language: QueryLanguage,
    statement: String,
    base_path: Option<String>,
    node_type: Option<String>,
    criterion: Criterion,
    order: OrderSpec,
    offset: u64,
    limit: Option<u64>,
}

impl QueryDescriptor {
    /// Creates a descriptor for a statement rendered in `language`.
    ///
    /// The requested language defaults to the rendered one.
    #[must_use]
    pub fn new(language: QueryLanguage, statement: impl Into<String>, criterion: Criterion) -> Self {
        Self {
            requested_language: language,
            language,
            statement: statement.into(),
            base_path: None,
            node_type: None,
            criterion,
            order: OrderSpec::new(),
            offset: 0,
            limit: None,
        }
    }

    /// A descriptor with no statement that matches everything.
    #[must_use]
    pub fn empty(language: QueryLanguage) -> Self {
        Self::new(language, String::new(), Junction::conjunction().into())
    }

    /// Records the language the caller asked for, which may be unspecified.
    #[must_use]
    pub fn with_requested_language(mut self, language: QueryLanguage) -> Self {
        self.requested_language = language;
        self
    }

    /// Replaces the statement.
    #[must_use]
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = statement.into();
        self
    }

    /// Sets the base path scope.
    #[must_use]
    pub fn with_base_path(mut self, base_path: Option<String>) -> Self {
        self.base_path = base_path;
        self
    }

    /// Sets the node type filter.
    #[must_use]
    pub fn with_node_type(mut self, node_type: Option<String>) -> Self {
        self.node_type = node_type;
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    /// Sets the number of leading rows to skip.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of rows. `Some(0)` means unbounded.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit.filter(|&n| n > 0);
        self
    }

    /// Copy with offset and limit cleared.
    #[must_use]
    pub fn without_paging(&self) -> Self {
        self.clone().with_offset(0).with_limit(None)
    }

    /// The language the caller asked for.
    #[must_use]
    pub fn requested_language(&self) -> QueryLanguage {
        self.requested_language
    }

    /// The language the statement is written in.
    #[must_use]
    pub fn language(&self) -> QueryLanguage {
        self.language
    }

    /// The rendered query text.
    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    /// The base path scope, if any.
    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// The node type filter, if any.
    #[must_use]
    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    /// The criterion the statement was rendered from.
    #[must_use]
    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    /// The ordering, primary key first.
    #[must_use]
    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Row limit; `None` is unbounded.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns true if offset or limit are set.
    #[must_use]
    pub fn is_paged(&self) -> bool {
        self.offset > 0 || self.limit.is_some()
    }
}

impl fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::Order;
    use crate::criterion::restrictions::eq;
    use smallvec::smallvec;

    #[test]
    fn test_builder_and_getters() {
        let d = QueryDescriptor::new(QueryLanguage::Sql2, "SELECT", eq("@a", 1).unwrap())
            .with_requested_language(QueryLanguage::Unspecified)
            .with_base_path(Some("/content".to_string()))
            .with_order(smallvec![Order::by_score()])
            .with_offset(10)
            .with_limit(Some(10));

        assert_eq!(d.requested_language(), QueryLanguage::Unspecified);
        assert_eq!(d.language(), QueryLanguage::Sql2);
        assert_eq!(d.base_path(), Some("/content"));
        assert_eq!(d.node_type(), None);
        assert_eq!(d.offset(), 10);
        assert_eq!(d.limit(), Some(10));
        assert!(d.is_paged());
        assert_eq!(d.to_string(), "SELECT");
    }

    #[test]
    fn test_without_paging_keeps_everything_else() {
        let d = QueryDescriptor::empty(QueryLanguage::XPath)
            .with_statement("//*")
            .with_offset(5)
            .with_limit(Some(3));
        let unpaged = d.without_paging();
        assert!(!unpaged.is_paged());
        assert_eq!(unpaged.statement(), "//*");
        assert_eq!(d.offset(), 5);
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let d = QueryDescriptor::empty(QueryLanguage::Sql2).with_limit(Some(0));
        assert_eq!(d.limit(), None);
    }
}
