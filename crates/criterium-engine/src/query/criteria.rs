//! The criteria builder.

use criterium_common::types::QueryLanguage;
use criterium_common::utils::error::Result;
use criterium_core::criterion::{Criterion, IntoProperty, Junction, Order, OrderSpec};
use criterium_core::repository::NT_UNSTRUCTURED;
use serde::{Deserialize, Serialize};

/// A complete query request: criteria, scope, ordering, paging, and the
/// target language.
///
/// Added criteria form an implicit conjunction. With none, every node in
/// scope matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    language: QueryLanguage,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_path: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    criteria: Vec<Criterion>,
    order: OrderSpec,
    offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u64>,
}

impl Criteria {
    /// Starts building criteria.
    #[must_use]
    pub fn builder() -> CriteriaBuilder {
        CriteriaBuilder::default()
    }

    /// The requested language; may be unspecified.
    #[must_use]
    pub fn language(&self) -> QueryLanguage {
        self.language
    }

    /// Copy with the language replaced.
    #[must_use]
    pub fn with_language(mut self, language: QueryLanguage) -> Self {
        self.language = language;
        self
    }

    /// The base path, as given.
    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    /// The node type filter.
    #[must_use]
    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    /// The added criteria, in order.
    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// The conjunction of all added criteria.
    #[must_use]
    pub fn criterion(&self) -> Criterion {
        self.criteria
            .iter()
            .cloned()
            .fold(Junction::conjunction(), Junction::add)
            .into()
    }

    /// Sort keys, primary first.
    #[must_use]
    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Page size; `None` is unbounded.
    #[must_use]
    pub fn max_results(&self) -> Option<u64> {
        self.max_results.filter(|&n| n > 0)
    }
}

/// Fluent builder for [`Criteria`].
#[derive(Debug, Clone, Default)]
pub struct CriteriaBuilder {
    criteria: Criteria,
}

impl CriteriaBuilder {
    /// Sets the target language.
    #[must_use]
    pub fn language(mut self, language: QueryLanguage) -> Self {
        self.criteria.language = language;
        self
    }

    /// Restricts results to descendants of `path`.
    #[must_use]
    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.criteria.base_path = Some(path.into());
        self
    }

    /// Restricts results to a primary type.
    #[must_use]
    pub fn node_type(mut self, node_type: impl Into<String>) -> Self {
        self.criteria.node_type = Some(node_type.into());
        self
    }

    /// Restricts results to `nt:unstructured` nodes.
    #[must_use]
    pub fn from_unstructured(self) -> Self {
        self.node_type(NT_UNSTRUCTURED)
    }

    /// Adds a criterion to the conjunction.
    #[must_use]
    pub fn add(mut self, criterion: Criterion) -> Self {
        self.criteria.criteria.push(criterion);
        self
    }

    /// Appends a sort key.
    #[must_use]
    pub fn order(mut self, order: Order) -> Self {
        self.criteria.order.push(order);
        self
    }

    /// Appends an ascending sort key.
    ///
    /// # Errors
    ///
    /// Fails for an invalid property name.
    pub fn asc(self, property: impl IntoProperty) -> Result<Self> {
        Ok(self.order(Order::asc(property)?))
    }

    /// Appends a descending sort key.
    ///
    /// # Errors
    ///
    /// Fails for an invalid property name.
    pub fn desc(self, property: impl IntoProperty) -> Result<Self> {
        Ok(self.order(Order::desc(property)?))
    }

    /// Sets the number of rows to skip.
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.criteria.offset = offset;
        self
    }

    /// Sets the page size. Zero means unbounded.
    #[must_use]
    pub fn max_results(mut self, max_results: u64) -> Self {
        self.criteria.max_results = Some(max_results).filter(|&n| n > 0);
        self
    }

    /// Finishes building.
    #[must_use]
    pub fn build(self) -> Criteria {
        self.criteria
    }
}
