//! # criterium-core
//!
//! Core layer for Criterium: the condition model, the executor contract,
//! and the paged result wrapper.
//!
//! This crate provides the grammar-independent half of the compiler. It
//! depends only on `criterium-common`.
//!
//! ## Modules
//!
//! - [`criterion`] - Composable criteria, match modes, ordering, lowering
//! - [`query`] - The compiled query descriptor
//! - [`execution`] - Executor contract and paged results
//! - [`repository`] - In-memory reference repository and executor

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod criterion;
pub mod execution;
pub mod query;
pub mod repository;

// Re-export commonly used types
pub use criterion::{
    CompareOp, Criterion, Direction, Junction, JunctionKind, MatchMode, Order, OrderKey,
    OrderSpec, Property,
};
pub use execution::{Cursor, Executor, PagedResult, Row};
pub use query::QueryDescriptor;
pub use repository::{MemoryExecutor, MemoryRepository};
