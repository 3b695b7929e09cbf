//! Jira Cloud client (REST API v3, agile API 1.0)
//!
//! Blocking calls with basic auth. Every request is bounded by the configured
//! timeout; nothing is retried.

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::config::Config;
use crate::core::executor::{CreateError, CreatedIssue, IssueCreator, IssueRequest};
use crate::jira::adf;

/// Longest response body kept in errors and logs
const MAX_BODY: usize = 500;

#[derive(Debug, Error)]
pub enum JiraError {
    #[error("Jira is not configured (missing {})", .0.join(", "))]
    NotConfigured(Vec<&'static str>),

    #[error("Jira returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Project,
    Board,
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectKind::Project => write!(f, "project"),
            ProjectKind::Board => write!(f, "board"),
        }
    }
}

/// A project or board the user can create tickets in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub key: String,
    pub name: String,
    pub id: String,
    pub kind: ProjectKind,
}

/// Jira Cloud client
pub struct JiraClient {
    base_url: String,
    email: String,
    api_token: String,
    http: Client,
    /// `None` until looked up; `Some(None)` when the site has no Epic Link field
    epic_link_field: Option<Option<String>>,
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_BODY).collect()
}

/// A timeout anywhere in the exchange counts as `Timeout`
fn transport_error(e: reqwest::Error) -> CreateError {
    if e.is_timeout() {
        CreateError::Timeout
    } else {
        CreateError::Transport(e.to_string())
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl JiraClient {
    /// Build a client from configuration
    pub fn new(config: &Config) -> Result<Self, JiraError> {
        if !config.is_configured() {
            return Err(JiraError::NotConfigured(config.missing()));
        }
        let http = Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            base_url: config.jira.url.trim_end_matches('/').to_string(),
            email: config.jira.email.clone(),
            api_token: config.jira.api_token.clone(),
            http,
            epic_link_field: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
    }

    fn check(response: Response) -> Result<Response, JiraError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(JiraError::Status {
            status: status.as_u16(),
            body: truncate_body(&body),
        })
    }

    /// Whether the credentials are accepted
    pub fn test_connection(&self) -> bool {
        match self.get("/rest/api/3/myself").send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::error!("connection test failed: {}", e);
                false
            }
        }
    }

    /// Projects plus boards, de-duplicated by project key (first wins)
    ///
    /// Boards are best effort: a site without the agile API still lists projects.
    pub fn projects(&self) -> Result<Vec<ProjectSummary>, JiraError> {
        let projects: Value = Self::check(self.get("/rest/api/3/project").send()?)?.json()?;

        let boards: Value = match self.get("/rest/agile/1.0/board").send() {
            Ok(response) if response.status().is_success() => {
                response.json().unwrap_or(Value::Null)
            }
            Ok(response) => {
                tracing::debug!(status = response.status().as_u16(), "board listing unavailable");
                Value::Null
            }
            Err(e) => {
                tracing::debug!("board listing failed: {}", e);
                Value::Null
            }
        };

        Ok(merge_projects(&projects, &boards))
    }

    /// Id of the "Epic Link" custom field, looked up once per client
    ///
    /// Team-managed projects have no such field. Only a completed lookup is
    /// cached; after a failed one the next call asks again.
    pub fn epic_link_field(&mut self) -> Option<String> {
        if let Some(cached) = &self.epic_link_field {
            return cached.clone();
        }

        match self
            .get("/rest/api/3/field")
            .send()
            .map_err(JiraError::from)
            .and_then(Self::check)
            .and_then(|r| r.json::<Value>().map_err(JiraError::from))
        {
            Ok(fields) => {
                let found = find_epic_link_field(&fields);
                tracing::debug!(field = ?found, "resolved epic link field");
                self.epic_link_field = Some(found.clone());
                found
            }
            Err(e) => {
                tracing::error!("failed to fetch Jira fields: {}", e);
                None
            }
        }
    }

    /// Create one issue
    pub fn create_issue(&mut self, request: &IssueRequest) -> Result<CreatedIssue, CreateError> {
        let epic_field = if request.epic_key.is_some() {
            self.epic_link_field()
        } else {
            None
        };
        let payload = issue_payload(request, epic_field.as_deref());

        let response = self
            .http
            .post(format!("{}/rest/api/3/issue", self.base_url))
            .basic_auth(&self.email, Some(&self.api_token))
            .header("Accept", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| {
                tracing::error!(summary = %request.summary, "Jira create_issue failed: {}", e);
                transport_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_body(&response.text().unwrap_or_default());
            tracing::error!(
                summary = %request.summary,
                status = status.as_u16(),
                body = %body,
                "Jira create_issue failed"
            );
            return Err(CreateError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().map_err(|e| {
            tracing::error!(summary = %request.summary, "unreadable Jira response: {}", e);
            transport_error(e)
        })?;
        body.get("key")
            .and_then(Value::as_str)
            .map(|key| CreatedIssue {
                key: key.to_string(),
            })
            .ok_or(CreateError::MissingKey)
    }

    /// Browser URL for an issue
    pub fn issue_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }
}

impl IssueCreator for JiraClient {
    fn create(&mut self, request: &IssueRequest) -> Result<CreatedIssue, CreateError> {
        self.create_issue(request)
    }

    fn issue_url(&self, key: &str) -> String {
        JiraClient::issue_url(self, key)
    }
}

/// Build the create-issue body
///
/// A direct parent goes into `fields.parent`. An epic goes into the Epic Link
/// field when the site has one, otherwise into `fields.parent` unless a direct
/// parent already took it.
pub fn issue_payload(request: &IssueRequest, epic_link_field: Option<&str>) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("project".into(), json!({ "key": request.project_key }));
    fields.insert("summary".into(), json!(request.summary));
    fields.insert("description".into(), adf::document(&request.description));
    fields.insert(
        "issuetype".into(),
        json!({ "name": request.issue_type.remote_name() }),
    );

    if let Some(parent) = &request.parent_key {
        fields.insert("parent".into(), json!({ "key": parent }));
    }
    if let Some(epic) = &request.epic_key {
        match epic_link_field {
            Some(field) => {
                fields.insert(field.to_string(), json!(epic));
            }
            None => {
                fields
                    .entry("parent")
                    .or_insert_with(|| json!({ "key": epic }));
            }
        }
    }

    json!({ "fields": fields })
}

/// Find the field named "Epic Link" (case-insensitive) in a field listing
fn find_epic_link_field(fields: &Value) -> Option<String> {
    fields.as_array()?.iter().find_map(|field| {
        let name = field.get("name")?.as_str()?;
        if name.trim().eq_ignore_ascii_case("epic link") {
            field.get("id")?.as_str().map(String::from)
        } else {
            None
        }
    })
}

/// Merge project and board listings, keeping the first entry per key
fn merge_projects(projects: &Value, boards: &Value) -> Vec<ProjectSummary> {
    let mut result: Vec<ProjectSummary> = Vec::new();

    let from_projects = projects.as_array().into_iter().flatten().filter_map(|p| {
        Some(ProjectSummary {
            key: p.get("key")?.as_str()?.to_string(),
            name: p.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            id: id_string(p.get("id").unwrap_or(&Value::Null)),
            kind: ProjectKind::Project,
        })
    });

    let from_boards = boards
        .get("values")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|b| {
            let key = b.get("location")?.get("projectKey")?.as_str()?;
            if key.is_empty() {
                return None;
            }
            Some(ProjectSummary {
                key: key.to_string(),
                name: format!(
                    "{} (Board)",
                    b.get("name").and_then(Value::as_str).unwrap_or_default()
                ),
                id: id_string(b.get("id").unwrap_or(&Value::Null)),
                kind: ProjectKind::Board,
            })
        });

    for summary in from_projects.chain(from_boards) {
        if !result.iter().any(|existing| existing.key == summary.key) {
            result.push(summary);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issue_type::IssueType;

    fn request(epic: Option<&str>, parent: Option<&str>) -> IssueRequest {
        IssueRequest {
            project_key: "KAN".to_string(),
            issue_type: IssueType::Story,
            summary: "Story A".to_string(),
            description: "line".to_string(),
            parent_key: parent.map(String::from),
            epic_key: epic.map(String::from),
        }
    }

    #[test]
    fn test_payload_basic_fields() {
        let payload = issue_payload(&request(None, None), None);
        let fields = &payload["fields"];
        assert_eq!(fields["project"]["key"], "KAN");
        assert_eq!(fields["issuetype"]["name"], "Story");
        assert_eq!(fields["description"]["type"], "doc");
        assert!(fields.get("parent").is_none());
    }

    #[test]
    fn test_payload_uses_epic_link_field() {
        let payload = issue_payload(&request(Some("KAN-1"), None), Some("customfield_10014"));
        assert_eq!(payload["fields"]["customfield_10014"], "KAN-1");
        assert!(payload["fields"].get("parent").is_none());
    }

    #[test]
    fn test_payload_falls_back_to_parent_for_epic() {
        let payload = issue_payload(&request(Some("KAN-1"), None), None);
        assert_eq!(payload["fields"]["parent"]["key"], "KAN-1");
    }

    #[test]
    fn test_payload_direct_parent_wins_over_epic_fallback() {
        let payload = issue_payload(&request(Some("KAN-1"), Some("KAN-2")), None);
        assert_eq!(payload["fields"]["parent"]["key"], "KAN-2");
    }

    #[test]
    fn test_find_epic_link_field() {
        let fields = json!([
            { "id": "summary", "name": "Summary" },
            { "id": "customfield_10014", "name": " Epic Link " }
        ]);
        assert_eq!(
            find_epic_link_field(&fields).as_deref(),
            Some("customfield_10014")
        );
        assert_eq!(find_epic_link_field(&json!([])), None);
    }

    #[test]
    fn test_merge_projects_dedupes_by_key() {
        let projects = json!([
            { "key": "KAN", "name": "Kanban", "id": "10000" },
            { "key": "OPS", "name": "Ops", "id": "10001" }
        ]);
        let boards = json!({ "values": [
            { "id": 1, "name": "KAN board", "location": { "projectKey": "KAN" } },
            { "id": 2, "name": "Web", "location": { "projectKey": "WEB" } },
            { "id": 3, "name": "Orphan", "location": {} }
        ]});
        let merged = merge_projects(&projects, &boards);
        let keys: Vec<&str> = merged.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["KAN", "OPS", "WEB"]);
        assert_eq!(merged[2].name, "Web (Board)");
        assert_eq!(merged[2].id, "2");
        assert_eq!(merged[2].kind, ProjectKind::Board);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(800);
        assert_eq!(truncate_body(&long).len(), MAX_BODY);
    }
}
