//! Compiled queries.
//!
//! Rendering lives in `criterium-adapters`; this module only holds the
//! artifact a renderer produces, so executors can depend on it without
//! pulling in either grammar.

pub mod descriptor;

pub use descriptor::QueryDescriptor;
