//! Run command.

use std::path::Path;

use anyhow::Result;
use comfy_table::Cell;
use criterium_common::types::QueryLanguage;
use criterium_core::{MemoryRepository, Row};
use criterium_engine::{Criteria, Session};
use serde::Serialize;
use tracing::info;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Debug, Serialize)]
struct RowOutput {
    path: String,
    primary_type: String,
    score: f64,
}

#[derive(Debug, Serialize)]
struct RunOutput {
    statement: String,
    rows: Vec<RowOutput>,
    total: u64,
    page: u64,
    pages: u64,
}

/// Run the run command.
pub fn run(
    criteria: &Path,
    data: &Path,
    language: Option<QueryLanguage>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let criteria = super::load_criteria(criteria, language)?;
    let nodes = super::load_nodes(data)?;

    let repository = MemoryRepository::new();
    repository.load(&nodes)?;
    info!(nodes = repository.node_count(), "loaded repository");

    let output = execute(&repository, &criteria)?;
    match format.into() {
        Format::Json => output::print_json(&output, quiet),
        Format::Table => {
            if quiet {
                return Ok(());
            }
            output::status(&output.statement, quiet);
            let mut table = output::create_table();
            output::add_header(&mut table, &["Path", "Type", "Score"]);
            for row in &output.rows {
                table.add_row(vec![
                    Cell::new(&row.path),
                    Cell::new(&row.primary_type),
                    Cell::new(format!("{:.2}", row.score)),
                ]);
            }
            println!("{table}");
            output::status(
                &format!(
                    "{} total, page {} of {}",
                    output.total, output.page, output.pages
                ),
                quiet,
            );
            Ok(())
        }
    }
}

fn execute(repository: &MemoryRepository, criteria: &Criteria) -> Result<RunOutput> {
    let executor = repository.executor();
    let session = Session::new(&executor);
    let result = session.execute(criteria)?;

    let rows = result
        .items(|row| RowOutput {
            path: row.path().to_string(),
            primary_type: row.primary_type().to_string(),
            score: row.score(),
        })?
        .collect::<criterium_common::utils::error::Result<Vec<_>>>()?;
    let total = result.total_size()?;

    Ok(RunOutput {
        statement: result.query().statement().to_string(),
        rows,
        total,
        page: result.page()?,
        pages: result.number_of_pages()?,
    })
}
