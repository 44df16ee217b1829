//! Session management.

use criterium_common::utils::error::Result;
use criterium_core::{Executor, PagedResult, QueryDescriptor};
use tracing::debug;

use crate::config::Config;
use crate::query::{Compiler, Criteria};

/// Compiles and runs criteria against one executor.
///
/// A session borrows its executor and holds no other state, so it is as
/// cheap to create as it is to drop.
pub struct Session<'e, E: Executor> {
    executor: &'e E,
    compiler: Compiler,
}

impl<'e, E: Executor> Session<'e, E> {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new(executor: &'e E) -> Self {
        Self::with_config(executor, Config::default())
    }

    /// Creates a session with a custom configuration.
    #[must_use]
    pub fn with_config(executor: &'e E, config: Config) -> Self {
        Self {
            executor,
            compiler: Compiler::new(config),
        }
    }

    /// The compiler used by this session.
    #[must_use]
    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// The executor queries run on.
    #[must_use]
    pub fn executor(&self) -> &'e E {
        self.executor
    }

    /// Compiles criteria without running them.
    ///
    /// An unspecified language resolves to the executor's preference before
    /// the configured default.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria cannot be rendered.
    pub fn compile(&self, criteria: &Criteria) -> Result<QueryDescriptor> {
        self.compiler
            .compile_criteria(criteria, self.executor.preferred_language())
    }

    /// Compiles and runs criteria.
    ///
    /// The query runs once, eagerly; the total size is only counted when
    /// asked for.
    ///
    /// # Errors
    ///
    /// Returns compilation errors, and executor failures unchanged.
    pub fn execute(&self, criteria: &Criteria) -> Result<PagedResult<'e, E>> {
        let query = self.compile(criteria)?;
        debug!(statement = query.statement(), "executing query");
        let cursor = self.executor.execute(&query)?;
        self.wrap(query, Some(cursor), criteria.offset(), criteria.max_results())
    }

    /// Wraps a cursor the caller obtained by executing `query` themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the count query cannot be derived.
    pub fn wrap_result(
        &self,
        query: QueryDescriptor,
        cursor: E::Cursor,
        offset: u64,
        items_per_page: Option<u64>,
    ) -> Result<PagedResult<'e, E>> {
        self.wrap(query, Some(cursor), offset, items_per_page)
    }

    fn wrap(
        &self,
        query: QueryDescriptor,
        cursor: Option<E::Cursor>,
        offset: u64,
        items_per_page: Option<u64>,
    ) -> Result<PagedResult<'e, E>> {
        let count_query = self.compiler.count_query(&query)?;
        Ok(PagedResult::new(
            self.executor,
            query,
            count_query,
            cursor,
            offset,
            items_per_page,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use criterium_common::types::QueryLanguage;
    use criterium_core::MemoryRepository;
    use criterium_core::criterion::restrictions::eq;

    fn repository() -> MemoryRepository {
        let repository = MemoryRepository::new();
        for i in 0..5 {
            let path = repository.add_node("/", &format!("node{i}")).unwrap();
            repository.set_property(&path, "n", i64::from(i)).unwrap();
        }
        repository
    }

    #[test]
    fn test_compile_uses_executor_preference() {
        let repository = repository();
        let executor = repository
            .executor()
            .with_preferred_language(Some(QueryLanguage::XPath));
        let session = Session::new(&executor);
        let query = session.compile(&Criteria::default()).unwrap();
        assert_eq!(query.language(), QueryLanguage::XPath);
        assert_eq!(query.statement(), "//*");
    }

    #[test]
    fn test_execute_runs_once() {
        let repository = repository();
        let executor = repository.executor();
        let session = Session::new(&executor);
        let criteria = Criteria::builder().add(eq("@n", 3).unwrap()).build();

        let result = session.execute(&criteria).unwrap();
        assert_eq!(executor.executions(), 1);
        assert!(!result.total_size_determined());

        let paths: Vec<String> = result
            .items(|row| row.node().path().to_string())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(paths, ["/node3"]);
        assert_eq!(executor.executions(), 1);

        assert_eq!(result.total_size().unwrap(), 1);
        assert_eq!(executor.executions(), 2);
    }

    #[test]
    fn test_wrap_result() {
        let repository = repository();
        let executor = repository.executor();
        let session = Session::new(&executor);
        let query = session
            .compile(&Criteria::builder().offset(2).max_results(2).build())
            .unwrap();
        let cursor = executor.execute(&query).unwrap();

        let result = session.wrap_result(query, cursor, 2, Some(2)).unwrap();
        assert_eq!(result.total_size().unwrap(), 6);
        assert_eq!(result.page().unwrap(), 2);
        assert_eq!(result.number_of_pages().unwrap(), 3);
    }
}
