//! # criterium-engine
//!
//! The entry point for Criterium: build [`Criteria`], compile them to a
//! [`QueryDescriptor`](criterium_core::QueryDescriptor), and execute them
//! through a [`Session`].
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`query`] - The criteria builder and the compiler
//! - [`session`] - Execution against an executor, paged results

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod query;
pub mod session;

pub use config::Config;
pub use query::{Compiler, Criteria, CriteriaBuilder};
pub use session::Session;
