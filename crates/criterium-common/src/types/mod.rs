//! Core type definitions for Criterium.
//!
//! This module contains the types shared by the condition model, the
//! renderers and the executor contract:
//! - Property values ([`Value`])
//! - Target grammars ([`QueryLanguage`])

mod language;
mod value;

pub use language::QueryLanguage;
pub use value::Value;
