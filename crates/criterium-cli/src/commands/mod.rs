//! CLI command implementations.

pub mod compile;
pub mod explain;
pub mod run;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use criterium_common::types::QueryLanguage;
use criterium_core::repository::NodeSpec;
use criterium_engine::Criteria;

/// Reads criteria from a JSON file, applying a language override.
pub fn load_criteria(path: &Path, language: Option<QueryLanguage>) -> Result<Criteria> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let criteria: Criteria = serde_json::from_str(&text)
        .with_context(|| format!("invalid criteria in {}", path.display()))?;
    Ok(match language {
        Some(language) => criteria.with_language(language),
        None => criteria,
    })
}

/// Reads a node list from a JSON file.
pub fn load_nodes(path: &Path) -> Result<Vec<NodeSpec>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid node list in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) fn json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_criteria_with_override() {
        let file = json_file(r#"{"language": "xpath", "offset": 3}"#);
        let criteria = load_criteria(file.path(), None).unwrap();
        assert_eq!(criteria.language(), QueryLanguage::XPath);
        assert_eq!(criteria.offset(), 3);

        let criteria = load_criteria(file.path(), Some(QueryLanguage::Sql2)).unwrap();
        assert_eq!(criteria.language(), QueryLanguage::Sql2);
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let file = json_file("{ not json");
        let err = load_criteria(file.path(), None).unwrap_err();
        assert!(err.to_string().starts_with("invalid criteria in"));

        let missing = Path::new("/nonexistent/criteria.json");
        let err = load_nodes(missing).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_load_nodes() {
        let file = json_file(
            r#"[
                {"path": "/news", "properties": {"title": {"string": "Hello"}}},
                {"path": "/news/a", "type": "my:article"}
            ]"#,
        );
        let nodes = load_nodes(file.path()).unwrap();
        assert_eq!(nodes.len(), 2);
    }
}
