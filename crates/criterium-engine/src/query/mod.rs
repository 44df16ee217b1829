//! Criteria and their compilation.
//!
//! - **Criteria**: what the caller wants, language and paging included
//! - **Compiler**: resolves the language and renders a descriptor

pub mod compiler;
pub mod criteria;

pub use compiler::Compiler;
pub use criteria::{Criteria, CriteriaBuilder};
