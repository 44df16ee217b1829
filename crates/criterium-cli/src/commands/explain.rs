//! Explain command.

use std::path::Path;

use anyhow::Result;
use criterium_common::types::QueryLanguage;
use criterium_core::QueryDescriptor;
use criterium_engine::{Compiler, Config};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

#[derive(Serialize)]
struct ExplainOutput<'a> {
    query: &'a QueryDescriptor,
    count_statement: &'a str,
}

/// Run the explain command.
pub fn run(
    criteria: &Path,
    language: Option<QueryLanguage>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let criteria = super::load_criteria(criteria, language)?;
    let compiler = Compiler::new(Config::default());
    let query = compiler.compile_criteria(&criteria, None)?;
    let count = compiler.count_query(&query)?;

    match format.into() {
        Format::Json => output::print_json(
            &ExplainOutput {
                query: &query,
                count_statement: count.statement(),
            },
            quiet,
        ),
        Format::Table => {
            output::print_key_value_table(&rows(&query, &count), quiet);
            Ok(())
        }
    }
}

fn rows(query: &QueryDescriptor, count: &QueryDescriptor) -> Vec<(&'static str, String)> {
    let order = query
        .order()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        ("Requested language", query.requested_language().to_string()),
        ("Language", query.language().to_string()),
        ("Statement", query.statement().to_string()),
        ("Count statement", count.statement().to_string()),
        ("Criterion", query.criterion().to_string()),
        ("Base path", query.base_path().unwrap_or("/").to_string()),
        ("Type", query.node_type().unwrap_or("(any)").to_string()),
        ("Order", if order.is_empty() { "(none)".to_string() } else { order }),
        ("Offset", query.offset().to_string()),
        (
            "Limit",
            query
                .limit()
                .map_or_else(|| "(unbounded)".to_string(), |n| n.to_string()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::json_file;

    #[test]
    fn test_rows() {
        let file = json_file(
            r#"{
                "base_path": "/news",
                "criteria": [{"kind": "null_check", "property": "@title", "not_null": true}],
                "order": [{"key": "@date", "direction": "desc"}],
                "max_results": 10
            }"#,
        );
        let criteria = crate::commands::load_criteria(file.path(), Some(QueryLanguage::XPath)).unwrap();
        let compiler = Compiler::new(Config::default());
        let query = compiler.compile_criteria(&criteria, None).unwrap();
        let count = compiler.count_query(&query).unwrap();

        let rows = rows(&query, &count);
        let get = |key: &str| rows.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str());
        assert_eq!(get("Statement"), Some("/jcr:root/news//*[@title] order by @date descending"));
        assert_eq!(get("Count statement"), Some("/jcr:root/news//*[@title]"));
        assert_eq!(get("Order"), Some("@date desc"));
        assert_eq!(get("Limit"), Some("10"));
    }
}
