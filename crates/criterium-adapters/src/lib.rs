//! # criterium-adapters
//!
//! Target grammars for Criterium. Each backend turns a lowered criterion
//! tree into query text for one language.
//!
//! ## Modules
//!
//! - [`query`] - The [`Renderer`](query::Renderer) trait and the backends
//!
//! ## Features
//!
//! - `xpath` - Path query grammar (default)
//! - `sql2` - JCR-SQL2 structured query grammar (default)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod query;

pub use query::{RenderRequest, Renderer, renderer};
