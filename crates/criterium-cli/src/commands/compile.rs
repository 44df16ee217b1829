//! Compile command.

use std::path::Path;

use anyhow::Result;
use criterium_common::types::QueryLanguage;
use criterium_engine::{Compiler, Config};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct CompileOutput {
    language: String,
    statement: String,
}

/// Run the compile command.
pub fn run(
    criteria: &Path,
    language: Option<QueryLanguage>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let criteria = super::load_criteria(criteria, language)?;
    let query = Compiler::new(Config::default()).compile_criteria(&criteria, None)?;

    match format.into() {
        Format::Json => output::print_json(
            &CompileOutput {
                language: query.language().to_string(),
                statement: query.statement().to_string(),
            },
            quiet,
        ),
        Format::Table => {
            output::status(query.statement(), quiet);
            Ok(())
        }
    }
}
