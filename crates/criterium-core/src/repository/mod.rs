//! In-memory reference repository.
//!
//! A small hierarchical content store and an [`Executor`](crate::Executor)
//! for it. Useful for tests and for trying criteria out without a real
//! content repository; the CLI's `run` command is built on it.

mod eval;
pub mod executor;
pub mod store;

pub use executor::{MemoryCursor, MemoryExecutor, MemoryRow};
pub use store::{MemoryNode, MemoryRepository, NT_BASE, NT_UNSTRUCTURED, NodeSpec};

impl MemoryRepository {
    /// Creates an executor over this repository.
    #[must_use]
    pub fn executor(&self) -> MemoryExecutor<'_> {
        MemoryExecutor::new(self)
    }
}
