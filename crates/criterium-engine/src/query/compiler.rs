//! Compilation of criteria into query descriptors.
//!
//! The compiler picks the target language, normalizes the scope, and asks
//! the matching backend for the statement text. It never executes
//! anything.
//!
//! Language resolution, first match wins:
//!
//! 1. the language named by the criteria
//! 2. the executor's preferred language
//! 3. [`Config::default_language`]

use criterium_adapters::{RenderRequest, renderer};
use criterium_common::types::QueryLanguage;
use criterium_common::utils::error::Result;
use criterium_core::QueryDescriptor;
use criterium_core::criterion::property::{is_root, normalize_path};
use criterium_core::criterion::{Criterion, Order, OrderSpec};
use tracing::{debug, info};

use super::Criteria;
use crate::config::Config;

/// Turns criteria into [`QueryDescriptor`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Creates a compiler with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves the language a query is rendered in.
    #[must_use]
    pub fn resolve_language(
        &self,
        requested: QueryLanguage,
        preferred: Option<QueryLanguage>,
    ) -> QueryLanguage {
        requested
            .or(preferred.unwrap_or(QueryLanguage::Unspecified))
            .or(self.config.default_language)
            .or(QueryLanguage::Sql2)
    }

    /// Renders a criterion with its scope and ordering.
    ///
    /// `language` may be unspecified, in which case the configured default
    /// is used. The base path is normalized; the root path scopes nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a relative base path or an illegal
    /// node type, and `UnsupportedInTarget` if the criterion has no form in
    /// the resolved language.
    pub fn compile(
        &self,
        criterion: &Criterion,
        language: QueryLanguage,
        base_path: Option<&str>,
        node_type: Option<&str>,
        order: &[Order],
    ) -> Result<QueryDescriptor> {
        let resolved = self.resolve_language(language, None);
        let base_path = base_path
            .map(normalize_path)
            .transpose()?
            .filter(|p| !is_root(p));

        let request = RenderRequest::new(criterion)
            .with_base_path(base_path.as_deref())
            .with_node_type(node_type)
            .with_order(order);
        let statement = renderer(resolved)?.render(&request)?;

        debug!(
            language = %resolved,
            requested = %language,
            statement = %statement,
            "compiled query"
        );
        if self.config.query_logging {
            info!(language = %resolved, "{statement}");
        }

        Ok(QueryDescriptor::new(resolved, statement, criterion.clone())
            .with_requested_language(language)
            .with_base_path(base_path)
            .with_node_type(node_type.map(str::to_string))
            .with_order(order.iter().cloned().collect()))
    }

    /// Compiles complete criteria, paging included.
    ///
    /// `preferred` is the executor's language preference, consulted when
    /// the criteria leave the language unspecified.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile).
    pub fn compile_criteria(
        &self,
        criteria: &Criteria,
        preferred: Option<QueryLanguage>,
    ) -> Result<QueryDescriptor> {
        let language = self.resolve_language(criteria.language(), preferred);
        let descriptor = self.compile(
            &criteria.criterion(),
            language,
            criteria.base_path(),
            criteria.node_type(),
            criteria.order(),
        )?;
        Ok(descriptor
            .with_requested_language(criteria.language())
            .with_offset(criteria.offset())
            .with_limit(criteria.max_results()))
    }

    /// Derives the query that counts all matches of `query`.
    ///
    /// Same criterion, scope, and language, with no ordering and no
    /// paging.
    ///
    /// # Errors
    ///
    /// Same as [`compile`](Self::compile); a descriptor that compiled once
    /// recompiles.
    pub fn count_query(&self, query: &QueryDescriptor) -> Result<QueryDescriptor> {
        let request = RenderRequest::new(query.criterion())
            .with_base_path(query.base_path())
            .with_node_type(query.node_type());
        let statement = renderer(query.language())?.render(&request)?;
        debug!(language = %query.language(), statement = %statement, "compiled count query");
        Ok(query
            .without_paging()
            .with_statement(statement)
            .with_order(OrderSpec::new()))
    }
}
