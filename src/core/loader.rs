//! Ticket batch files
//!
//! Batches are YAML or JSON, either a bare list of tickets or an analyzer
//! response of the form `{ "tickets": [...] }`. Files ending in `.json` are
//! parsed as JSON, everything else as YAML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::ticket::{Ticket, TicketBatch, TicketDraft};
use crate::yaml::{parse_json, parse_yaml, YamlError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BatchFile {
    List(Vec<TicketDraft>),
    Wrapped { tickets: Vec<TicketDraft> },
}

impl BatchFile {
    fn into_drafts(self) -> Vec<TicketDraft> {
        match self {
            BatchFile::List(drafts) | BatchFile::Wrapped { tickets: drafts } => drafts,
        }
    }
}

/// Wrapper written back to disk so saved batches reload unchanged
#[derive(Debug, Serialize)]
struct SavedBatch<'a> {
    tickets: &'a [Ticket],
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Parse batch content; `filename` decides the format and labels errors
pub fn parse_batch(content: &str, filename: &str) -> Result<TicketBatch, YamlError> {
    let file: BatchFile = if is_json(Path::new(filename)) {
        parse_json(content, filename)?
    } else {
        parse_yaml(content, filename)?
    };
    Ok(TicketBatch::from_drafts(file.into_drafts()))
}

/// Load a batch file
pub fn load_batch(path: &Path) -> Result<TicketBatch, YamlError> {
    let content = fs::read_to_string(path)?;
    let batch = parse_batch(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), tickets = batch.len(), "loaded batch");
    Ok(batch)
}

/// Write a batch back to disk in the format its extension implies
pub fn save_batch(path: &Path, batch: &TicketBatch) -> std::io::Result<()> {
    let wrapped = SavedBatch {
        tickets: batch.tickets(),
    };
    let content = if is_json(path) {
        serde_json::to_string_pretty(&wrapped).map_err(std::io::Error::other)?
    } else {
        serde_yml::to_string(&wrapped).map_err(std::io::Error::other)?
    };
    fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_yaml_list() {
        let yaml = r#"
- type: Epic
  summary: Checkout
- type: Sub-task
  summary: Wire button
  parent_index: 0
  acceptance_criteria:
    - clickable
"#;
        let batch = parse_batch(yaml, "batch.yaml").unwrap();
        assert_eq!(batch.len(), 2);
        let sub = batch.get(1).unwrap();
        assert_eq!(sub.parent_index, Some(0));
        assert_eq!(sub.acceptance_criteria, vec!["clickable".to_string()]);
    }

    #[test]
    fn test_parse_analyzer_json() {
        let json = r#"{"tickets": [
            {"type": "Story", "summary": "Login", "description": "d", "parent_index": null},
            {"summary": "Untyped"}
        ]}"#;
        let batch = parse_batch(json, "analysis.json").unwrap();
        assert_eq!(batch.get(0).unwrap().issue_type, "Story");
        assert_eq!(batch.get(1).unwrap().issue_type, "Task");
        assert_eq!(batch.get(1).unwrap().index, 1);
    }

    #[test]
    fn test_parse_rejects_scalar() {
        assert!(parse_batch("just text", "batch.yaml").is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        for name in ["batch.yaml", "batch.json"] {
            let path = tmp.path().join(name);
            let original = parse_batch(
                "- type: Epic\n  summary: E\n- type: Story\n  summary: S\n  parent_index: 0\n",
                "in.yaml",
            )
            .unwrap();
            save_batch(&path, &original).unwrap();
            let reloaded = load_batch(&path).unwrap();
            assert_eq!(reloaded, original, "{name}");
        }
    }

    #[test]
    fn test_recorded_keys_survive_reload() {
        let tmp = TempDir::new().unwrap();
        for name in ["keys.yaml", "keys.json"] {
            let path = tmp.path().join(name);
            let mut batch = parse_batch(
                "- type: Epic\n  summary: E\n- type: Story\n  summary: S\n  parent_index: 0\n",
                "in.yaml",
            )
            .unwrap();
            batch.record_keys([(0, "KAN-1"), (1, "KAN-2")]);

            save_batch(&path, &batch).unwrap();
            let reloaded = load_batch(&path).unwrap();
            assert_eq!(reloaded, batch, "{name}");
            assert_eq!(reloaded.get(1).unwrap().key.as_deref(), Some("KAN-2"));
        }
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let batch = parse_batch("- summary: S\n  key: \"  \"\n", "batch.yaml").unwrap();
        assert_eq!(batch.get(0).unwrap().key, None);
    }
}
