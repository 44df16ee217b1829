//! An [`Executor`] over a [`MemoryRepository`].

use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use criterium_common::types::{QueryLanguage, Value};
use criterium_common::utils::error::{Error, Result};
use tracing::debug;

use super::eval::Matcher;
use super::store::{MemoryNode, MemoryRepository, NT_BASE};
use crate::criterion::property::is_root;
use crate::criterion::{Direction, Order, OrderKey, lower};
use crate::execution::{Cursor, Executor, Row};
use crate::query::QueryDescriptor;

/// Score reported for every row; the repository does no ranking.
const SCORE: f64 = 1.0;

/// Runs descriptors against a [`MemoryRepository`].
///
/// The statement text is not parsed. The executor evaluates the
/// descriptor's criterion directly, with the semantics both grammars give
/// it, so results are identical whichever language was rendered.
pub struct MemoryExecutor<'r> {
    repository: &'r MemoryRepository,
    paging: bool,
    requery: bool,
    native_size: bool,
    preferred: Option<QueryLanguage>,
    failure: Option<String>,
    executions: AtomicU64,
}

impl<'r> MemoryExecutor<'r> {
    /// Creates an executor that applies paging, supports re-query, and
    /// does not report a native size.
    #[must_use]
    pub fn new(repository: &'r MemoryRepository) -> Self {
        Self {
            repository,
            paging: true,
            requery: true,
            native_size: false,
            preferred: None,
            failure: None,
            executions: AtomicU64::new(0),
        }
    }

    /// Whether offset and limit are applied here or left to the caller.
    #[must_use]
    pub fn with_paging(mut self, enabled: bool) -> Self {
        self.paging = enabled;
        self
    }

    /// Whether a descriptor may be executed more than once.
    #[must_use]
    pub fn with_requery(mut self, enabled: bool) -> Self {
        self.requery = enabled;
        self
    }

    /// Whether cursors report the total match count.
    #[must_use]
    pub fn with_native_size(mut self, enabled: bool) -> Self {
        self.native_size = enabled;
        self
    }

    /// The language to pick for unspecified queries.
    #[must_use]
    pub fn with_preferred_language(mut self, language: Option<QueryLanguage>) -> Self {
        self.preferred = language;
        self
    }

    /// Makes every execution fail with `message`.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of times [`execute`](Executor::execute) has been called.
    #[must_use]
    pub fn executions(&self) -> u64 {
        self.executions.load(AtomicOrdering::Relaxed)
    }

    fn in_scope(query: &QueryDescriptor, node: &MemoryNode) -> bool {
        if let Some(base) = query.base_path().filter(|p| !is_root(p)) {
            let below = node
                .path()
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'));
            if !below {
                return false;
            }
        }
        match query.node_type() {
            None | Some(NT_BASE) => true,
            Some(node_type) => node.primary_type() == node_type,
        }
    }
}

impl Executor for MemoryExecutor<'_> {
    type Row = MemoryRow;
    type Cursor = MemoryCursor;

    fn execute(&self, query: &QueryDescriptor) -> Result<MemoryCursor> {
        self.executions.fetch_add(1, AtomicOrdering::Relaxed);
        if let Some(message) = &self.failure {
            return Err(Error::execution(message.clone()));
        }

        let matcher = Matcher::new(&lower(query.criterion()))?;
        let mut hits: Vec<Arc<MemoryNode>> = self
            .repository
            .document_order()
            .into_iter()
            .filter(|node| Self::in_scope(query, node) && matcher.matches(node))
            .collect();
        if !query.order().is_empty() {
            hits.sort_by(|a, b| compare_nodes(query.order(), a, b));
        }
        let total = hits.len() as u64;

        let rows: Vec<MemoryRow> = if self.paging {
            let skip = usize::try_from(query.offset()).unwrap_or(usize::MAX);
            let take = query
                .limit()
                .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
            hits.into_iter().skip(skip).take(take).map(MemoryRow::new).collect()
        } else {
            hits.into_iter().map(MemoryRow::new).collect()
        };

        debug!(
            statement = query.statement(),
            total,
            returned = rows.len(),
            "memory query executed"
        );
        Ok(MemoryCursor {
            rows: rows.into_iter(),
            size: self.native_size.then_some(total),
        })
    }

    fn applies_paging(&self) -> bool {
        self.paging
    }

    fn supports_requery(&self) -> bool {
        self.requery
    }

    fn preferred_language(&self) -> Option<QueryLanguage> {
        self.preferred
    }
}

fn compare_nodes(order: &[Order], a: &MemoryNode, b: &MemoryNode) -> Ordering {
    for entry in order {
        let ordering = match &entry.key {
            OrderKey::Score => Ordering::Equal,
            OrderKey::Property(p) => compare_missing_first(
                a.property(p.name()),
                b.property(p.name()),
            ),
        };
        let ordering = match entry.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_missing_first(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .compare(b)
            .unwrap_or_else(|| a.type_name().cmp(b.type_name())),
    }
}

/// A matching node.
#[derive(Debug, Clone)]
pub struct MemoryRow {
    node: Arc<MemoryNode>,
}

impl MemoryRow {
    fn new(node: Arc<MemoryNode>) -> Self {
        Self { node }
    }

    /// The underlying node.
    #[must_use]
    pub fn node(&self) -> &MemoryNode {
        &self.node
    }
}

impl Row for MemoryRow {
    fn path(&self) -> &str {
        self.node.path()
    }

    fn primary_type(&self) -> &str {
        self.node.primary_type()
    }

    fn score(&self) -> f64 {
        SCORE
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.node.property(name).cloned()
    }
}

/// Rows of one execution.
#[derive(Debug)]
pub struct MemoryCursor {
    rows: std::vec::IntoIter<MemoryRow>,
    size: Option<u64>,
}

impl Iterator for MemoryCursor {
    type Item = Result<MemoryRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl Cursor<MemoryRow> for MemoryCursor {
    fn size(&self) -> Option<u64> {
        self.size
    }
}
