//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use jat::core::executor::{CreateError, CreatedIssue, IssueCreator, IssueRequest};

/// Helper to get a jat command isolated from the user's config and Jira env
pub fn jat(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("jat"));
    cmd.env("JAT_CONFIG_DIR", config_dir.path())
        .env_remove("JIRA_URL")
        .env_remove("JIRA_EMAIL")
        .env_remove("JIRA_API_TOKEN")
        .env_remove("JIRA_PROJECT_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a batch file into `tmp` and return its path
pub fn write_batch(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Epic with a story, a task and a subtask under the story
pub const EPIC_BATCH: &str = r#"
tickets:
  - type: Epic
    summary: Checkout revamp
  - type: Story
    summary: Guest checkout
    parent_index: 0
  - type: Task
    summary: Payment audit
    parent_index: 0
  - type: Sub-task
    summary: Card form
    parent_index: 1
"#;

/// Issue creator that hands out sequential keys and records every request
#[derive(Debug, Default)]
pub struct RecordingCreator {
    pub next: u32,
    pub fail_on: Vec<String>,
    pub requests: Vec<IssueRequest>,
}

impl RecordingCreator {
    pub fn starting_at(next: u32) -> Self {
        Self {
            next,
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, summary: &str) -> Self {
        self.fail_on.push(summary.to_string());
        self
    }

    pub fn request(&self, summary: &str) -> &IssueRequest {
        self.requests
            .iter()
            .find(|r| r.summary == summary)
            .unwrap_or_else(|| panic!("no request for {}", summary))
    }
}

impl IssueCreator for RecordingCreator {
    fn create(&mut self, request: &IssueRequest) -> Result<CreatedIssue, CreateError> {
        self.requests.push(request.clone());
        if self.fail_on.contains(&request.summary) {
            return Err(CreateError::Rejected {
                status: 400,
                body: "rejected".to_string(),
            });
        }
        let key = format!("KAN-{}", self.next);
        self.next += 1;
        Ok(CreatedIssue { key })
    }

    fn issue_url(&self, key: &str) -> String {
        format!("https://example.atlassian.net/browse/{}", key)
    }
}
