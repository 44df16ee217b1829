//! Paged, lazily counted results.

use std::cell::RefCell;
use std::marker::PhantomData;

use criterium_common::utils::error::{Error, Result};
use once_cell::unsync::OnceCell;
use tracing::{debug, trace};

use super::{Cursor, Executor, Row};
use crate::query::QueryDescriptor;

/// The result of executing a query.
///
/// Owns the first cursor produced by the executor and hands it out on the
/// first call to [`items`](Self::items). Later calls re-run the query if
/// the executor allows it.
///
/// The total size is resolved on demand, at most once. A native size
/// reported by the first cursor is used as is; otherwise the count query
/// (the same criterion rendered without paging or ordering) is run.
/// Page arithmetic needs the total, so [`page`](Self::page) and
/// [`number_of_pages`](Self::number_of_pages) fail until it is known.
///
/// Not thread safe. A `PagedResult` holds a single cursor and an
/// unsynchronized memo cell; share it across threads only behind a lock.
pub struct PagedResult<'e, E: Executor> {
    executor: &'e E,
    query: QueryDescriptor,
    count_query: QueryDescriptor,
    pending: RefCell<Option<E::Cursor>>,
    native_size: Option<u64>,
    total_size: OnceCell<u64>,
    offset: u64,
    items_per_page: Option<u64>,
}

impl<'e, E: Executor> PagedResult<'e, E> {
    /// Wraps a cursor obtained by executing `query`.
    ///
    /// `items_per_page` of `None` or `Some(0)` means one unbounded page.
    #[must_use]
    pub fn new(
        executor: &'e E,
        query: QueryDescriptor,
        count_query: QueryDescriptor,
        cursor: Option<E::Cursor>,
        offset: u64,
        items_per_page: Option<u64>,
    ) -> Self {
        let native_size = cursor.as_ref().and_then(|cursor| cursor.size());
        Self {
            executor,
            query,
            count_query,
            pending: RefCell::new(cursor),
            native_size,
            total_size: OnceCell::new(),
            offset,
            items_per_page: items_per_page.filter(|&n| n > 0),
        }
    }

    /// Returns the rows of this page, each passed through `mapper`.
    ///
    /// The sequence is lazy and forward only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if the rows were already consumed and
    /// the executor cannot re-run the query, or any error from re-running it.
    pub fn items<T, F>(&self, mapper: F) -> Result<Items<E::Cursor, E::Row, F>>
    where
        F: FnMut(&E::Row) -> T,
    {
        let cursor = match self.pending.borrow_mut().take() {
            Some(cursor) => cursor,
            None if self.executor.supports_requery() => {
                trace!(statement = self.query.statement(), "re-executing query");
                self.executor.execute(&self.query)?
            }
            None => {
                return Err(Error::IllegalState(
                    "rows were already consumed and the query cannot be re-executed".to_string(),
                ));
            }
        };

        let (skip, remaining) = if self.executor.applies_paging() {
            (0, None)
        } else {
            (self.offset, self.items_per_page)
        };
        Ok(Items {
            cursor,
            skip,
            remaining,
            failed: false,
            mapper,
            _row: PhantomData,
        })
    }

    /// Returns the total number of matches, resolving it on the first call.
    ///
    /// # Errors
    ///
    /// Passes through executor failures. A failed resolution leaves the
    /// total unresolved.
    pub fn total_size(&self) -> Result<u64> {
        self.total_size
            .get_or_try_init(|| self.resolve_total_size())
            .copied()
    }

    fn resolve_total_size(&self) -> Result<u64> {
        if let Some(size) = self.native_size {
            trace!(size, "using native size");
            return Ok(size);
        }
        debug!(statement = self.count_query.statement(), "resolving total size");
        let cursor = self.executor.execute(&self.count_query)?;
        if let Some(size) = cursor.size() {
            return Ok(size);
        }
        let mut count = 0;
        for row in cursor {
            row?;
            count += 1;
        }
        Ok(count)
    }

    /// Returns true once the total size has been resolved.
    #[must_use]
    pub fn total_size_determined(&self) -> bool {
        self.total_size.get().is_some()
    }

    fn resolved_total(&self, what: &str) -> Result<u64> {
        self.total_size.get().copied().ok_or_else(|| {
            Error::IllegalState(format!("{what} is undefined until the total size is resolved"))
        })
    }

    /// The 1-based page this result shows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] before [`total_size`](Self::total_size)
    /// has resolved.
    pub fn page(&self) -> Result<u64> {
        self.resolved_total("page")?;
        Ok(match self.items_per_page {
            Some(per_page) => self.offset / per_page + 1,
            None => 1,
        })
    }

    /// The number of pages at the current page size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] before [`total_size`](Self::total_size)
    /// has resolved.
    pub fn number_of_pages(&self) -> Result<u64> {
        let total = self.resolved_total("number of pages")?;
        Ok(match self.items_per_page {
            Some(per_page) => total.div_ceil(per_page),
            None => u64::from(total > 0),
        })
    }

    /// Rows per page; `None` is unbounded.
    #[must_use]
    pub fn items_per_page(&self) -> Option<u64> {
        self.items_per_page
    }

    /// Rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The executed query.
    #[must_use]
    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    /// The query used to resolve the total size.
    #[must_use]
    pub fn count_query(&self) -> &QueryDescriptor {
        &self.count_query
    }
}

/// Lazy sequence of mapped rows returned by [`PagedResult::items`].
///
/// Ends after the first cursor error.
pub struct Items<C, R, F> {
    cursor: C,
    skip: u64,
    remaining: Option<u64>,
    failed: bool,
    mapper: F,
    _row: PhantomData<fn(&R)>,
}

impl<C, R, F, T> Iterator for Items<C, R, F>
where
    C: Cursor<R>,
    R: Row,
    F: FnMut(&R) -> T,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == Some(0) {
            return None;
        }
        while self.skip > 0 {
            self.skip -= 1;
            if let Err(e) = self.cursor.next()? {
                self.failed = true;
                return Some(Err(e));
            }
        }
        let row = match self.cursor.next()? {
            Ok(row) => row,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(Ok((self.mapper)(&row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::Junction;
    use crate::repository::MemoryRepository;
    use criterium_common::types::QueryLanguage;

    fn repository(n: usize) -> MemoryRepository {
        let repo = MemoryRepository::new();
        for i in 0..n {
            repo.add_node("/", &format!("node{i}")).unwrap();
        }
        repo
    }

    fn paged_query(offset: u64, limit: Option<u64>) -> (QueryDescriptor, QueryDescriptor) {
        let query = QueryDescriptor::new(QueryLanguage::Sql2, "q", Junction::conjunction().into())
            .with_node_type(Some("nt:unstructured".to_string()))
            .with_offset(offset)
            .with_limit(limit);
        let count = query.without_paging();
        (query, count)
    }

    #[test]
    fn test_page_math_requires_total() {
        let repo = repository(101);
        // The root is nt:unstructured too.
        let executor = repo.executor();
        let (query, count) = paged_query(10, Some(10));
        let cursor = executor.execute(&query).unwrap();
        let result = PagedResult::new(&executor, query, count, Some(cursor), 10, Some(10));

        assert!(!result.total_size_determined());
        assert!(matches!(result.page(), Err(Error::IllegalState(_))));
        assert!(matches!(result.number_of_pages(), Err(Error::IllegalState(_))));

        assert_eq!(result.total_size().unwrap(), 102);
        assert!(result.total_size_determined());
        assert_eq!(result.page().unwrap(), 2);
        assert_eq!(result.number_of_pages().unwrap(), 11);
    }

    #[test]
    fn test_count_runs_once() {
        let repo = repository(5);
        let executor = repo.executor();
        let (query, count) = paged_query(0, None);
        let result = PagedResult::new(&executor, query, count, None, 0, None);

        let before = executor.executions();
        assert_eq!(result.total_size().unwrap(), 6);
        assert_eq!(result.total_size().unwrap(), 6);
        assert_eq!(executor.executions(), before + 1);
        assert_eq!(result.number_of_pages().unwrap(), 1);
    }

    #[test]
    fn test_wrapper_pages_when_executor_does_not() {
        let repo = repository(20);
        let executor = repo.executor().with_paging(false);
        let (query, count) = paged_query(5, Some(3));
        let cursor = executor.execute(&query).unwrap();
        let result = PagedResult::new(&executor, query, count, Some(cursor), 5, Some(3));

        let paths: Vec<String> = result
            .items(|row| row.path().to_string())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(paths, ["/node4", "/node5", "/node6"]);
    }

    #[test]
    fn test_requery_and_one_shot() {
        let repo = repository(3);
        let executor = repo.executor();
        let (query, count) = paged_query(0, None);
        let cursor = executor.execute(&query).unwrap();
        let result = PagedResult::new(&executor, query.clone(), count.clone(), Some(cursor), 0, None);
        assert_eq!(result.items(|_| ()).unwrap().count(), 4);
        assert_eq!(result.items(|_| ()).unwrap().count(), 4);

        let one_shot = repo.executor().with_requery(false);
        let cursor = one_shot.execute(&query).unwrap();
        let result = PagedResult::new(&one_shot, query, count, Some(cursor), 0, None);
        assert_eq!(result.items(|_| ()).unwrap().count(), 4);
        assert!(matches!(
            result.items(|_| ()),
            Err(Error::IllegalState(_))
        ));
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let repo = repository(3);
        let executor = repo.executor().with_paging(false);
        let (query, count) = paged_query(50, Some(10));
        let result = PagedResult::new(&executor, query, count, None, 50, Some(10));
        assert_eq!(result.items(|_| ()).unwrap().count(), 0);
        assert_eq!(result.total_size().unwrap(), 4);
        assert_eq!(result.page().unwrap(), 6);
    }

    #[test]
    fn test_native_size_skips_count_query() {
        let repo = repository(5);
        let executor = repo.executor().with_native_size(true);
        let (query, count) = paged_query(0, Some(2));
        let cursor = executor.execute(&query).unwrap();
        let result = PagedResult::new(&executor, query, count, Some(cursor), 0, Some(2));

        let before = executor.executions();
        assert_eq!(result.total_size().unwrap(), 6);
        assert_eq!(executor.executions(), before);
        assert_eq!(result.number_of_pages().unwrap(), 3);
    }

    #[test]
    fn test_native_size_survives_consumed_cursor() {
        let repo = repository(5);
        let executor = repo.executor().with_native_size(true).with_requery(false);
        let (query, count) = paged_query(0, Some(2));
        let cursor = executor.execute(&query).unwrap();
        let result = PagedResult::new(&executor, query, count, Some(cursor), 0, Some(2));

        assert_eq!(result.items(|_| ()).unwrap().count(), 2);
        assert!(!result.total_size_determined());

        let before = executor.executions();
        assert_eq!(result.total_size().unwrap(), 6);
        assert_eq!(executor.executions(), before);
    }

    struct StubRow(&'static str);

    impl Row for StubRow {
        fn path(&self) -> &str {
            self.0
        }

        fn primary_type(&self) -> &str {
            "nt:base"
        }

        fn score(&self) -> f64 {
            1.0
        }

        fn property(&self, _name: &str) -> Option<criterium_common::types::Value> {
            None
        }
    }

    struct StubCursor(std::vec::IntoIter<Result<StubRow>>);

    impl Iterator for StubCursor {
        type Item = Result<StubRow>;

        fn next(&mut self) -> Option<Self::Item> {
            self.0.next()
        }
    }

    impl Cursor<StubRow> for StubCursor {}

    fn stub_items(
        rows: Vec<Result<StubRow>>,
        skip: u64,
        remaining: Option<u64>,
    ) -> Items<StubCursor, StubRow, impl FnMut(&StubRow) -> String> {
        Items {
            cursor: StubCursor(rows.into_iter()),
            skip,
            remaining,
            failed: false,
            mapper: |row: &StubRow| row.path().to_string(),
            _row: PhantomData,
        }
    }

    #[test]
    fn test_items_end_after_error_while_skipping() {
        let rows = vec![
            Err(Error::execution("cursor broke")),
            Ok(StubRow("/a")),
            Ok(StubRow("/b")),
            Ok(StubRow("/c")),
        ];
        let mut items = stub_items(rows, 1, Some(2));

        assert!(matches!(items.next(), Some(Err(Error::Execution(_)))));
        assert!(items.next().is_none());
    }

    #[test]
    fn test_items_end_after_error_mid_page() {
        let rows = vec![
            Ok(StubRow("/a")),
            Ok(StubRow("/b")),
            Err(Error::execution("cursor broke")),
            Ok(StubRow("/c")),
        ];
        let mut items = stub_items(rows, 1, Some(3));

        assert_eq!(items.next().unwrap().unwrap(), "/b");
        assert!(matches!(items.next(), Some(Err(Error::Execution(_)))));
        assert!(items.next().is_none());
    }

    #[test]
    fn test_unbounded_page_with_no_matches() {
        let repo = MemoryRepository::new();
        let executor = repo.executor();
        let query = QueryDescriptor::new(QueryLanguage::XPath, "q", Junction::disjunction().into());
        let result = PagedResult::new(&executor, query.clone(), query, None, 0, Some(0));
        assert_eq!(result.items_per_page(), None);
        assert_eq!(result.total_size().unwrap(), 0);
        assert_eq!(result.number_of_pages().unwrap(), 0);
        assert_eq!(result.page().unwrap(), 1);
    }
}
