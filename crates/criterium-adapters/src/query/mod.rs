//! Query text generation.
//!
//! Both backends consume the same [`RenderRequest`] and lower the
//! criterion with [`criterium_core::criterion::lower`] before rendering, so
//! desugaring and constant folding are identical across grammars. What
//! differs is syntax, quoting, and which predicates a grammar can express:
//!
//! | Concern            | XPath                         | JCR-SQL2                        |
//! |--------------------|-------------------------------|---------------------------------|
//! | descendant-of      | folded into the path scope    | `ISDESCENDANTNODE` predicate    |
//! | null check         | `@p` / `not(@p)`              | `IS NOT NULL` / `IS NULL`       |
//! | precedence         | parenthesized nested junctions| every junction child wrapped    |
//! | booleans and dates | `true()`, `xs:dateTime(..)`   | `CAST(.. AS BOOLEAN)`, `CAST(.. AS DATE)` |
//!
//! Offset and limit are never part of the text. They travel on the
//! descriptor and are applied by the executor or the paged wrapper.

pub mod literal;

#[cfg(feature = "sql2")]
pub mod sql2;

#[cfg(feature = "xpath")]
pub mod xpath;

use criterium_common::types::QueryLanguage;
use criterium_common::utils::error::{Error, Result};
use criterium_core::criterion::{Criterion, Order};

/// Everything a backend needs to render one statement.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// The condition tree.
    pub criterion: &'a Criterion,
    /// Restricts results to descendants of this path.
    pub base_path: Option<&'a str>,
    /// Restricts results to this primary type.
    pub node_type: Option<&'a str>,
    /// Sort keys, primary first.
    pub order: &'a [Order],
}

impl<'a> RenderRequest<'a> {
    /// A request with no scoping and no ordering.
    #[must_use]
    pub fn new(criterion: &'a Criterion) -> Self {
        Self {
            criterion,
            base_path: None,
            node_type: None,
            order: &[],
        }
    }

    /// Sets the base path.
    #[must_use]
    pub fn with_base_path(mut self, base_path: Option<&'a str>) -> Self {
        self.base_path = base_path;
        self
    }

    /// Sets the node type filter.
    #[must_use]
    pub fn with_node_type(mut self, node_type: Option<&'a str>) -> Self {
        self.node_type = node_type;
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn with_order(mut self, order: &'a [Order]) -> Self {
        self.order = order;
        self
    }

    /// Returns the node type after checking it is a plain name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for names that could break out of
    /// the type selector.
    pub fn checked_node_type(&self) -> Result<Option<&'a str>> {
        match self.node_type {
            Some(t)
                if t.is_empty()
                    || t.chars().any(|c| {
                        c.is_whitespace() || matches!(c, '[' | ']' | '\'' | '"' | '(' | ')' | ',')
                    }) =>
            {
                Err(Error::InvalidArgument(format!("illegal node type {t:?}")))
            }
            other => Ok(other),
        }
    }
}

/// A backend for one query language.
pub trait Renderer: Send + Sync {
    /// The language this renderer produces.
    fn language(&self) -> QueryLanguage;

    /// Renders a statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedInTarget`] naming the first criterion
    /// the grammar cannot express. No partial text is ever returned.
    fn render(&self, request: &RenderRequest<'_>) -> Result<String>;
}

/// Looks up the renderer for a language.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for [`QueryLanguage::Unspecified`]
/// (resolve it first) and [`Error::Internal`] when the backend's cargo
/// feature is disabled.
pub fn renderer(language: QueryLanguage) -> Result<&'static dyn Renderer> {
    match language {
        #[cfg(feature = "xpath")]
        QueryLanguage::XPath => Ok(&xpath::XPathRenderer),
        #[cfg(feature = "sql2")]
        QueryLanguage::Sql2 => Ok(&sql2::Sql2Renderer),
        QueryLanguage::Unspecified => Err(Error::InvalidArgument(
            "an unspecified language must be resolved before rendering".to_string(),
        )),
        #[allow(unreachable_patterns)]
        other => Err(Error::Internal(format!(
            "{other} support is not enabled in this build"
        ))),
    }
}
