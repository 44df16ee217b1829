//! # criterium-common
//!
//! Foundation layer for Criterium: value types, query languages, and errors.
//!
//! This crate provides the fundamental building blocks used by all other
//! Criterium crates. It has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions ([`Value`], [`QueryLanguage`])
//! - [`utils`] - Utility functions and helpers (errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{QueryLanguage, Value};
pub use utils::error::{Error, Result};
