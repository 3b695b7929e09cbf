//! Creation executor - resolves linkage and creates tickets one at a time
//!
//! Each ticket moves `Pending -> Resolving -> {Created, Skipped, Failed}`.
//! Tickets run strictly in plan order because a ticket's linkage reads the remote
//! keys of tickets created earlier in the same run. Nothing a single ticket does
//! aborts the batch; degraded outcomes are reported as notes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::core::ancestry::AncestorResolver;
use crate::core::issue_type::IssueType;
use crate::core::planner::plan;
use crate::core::ticket::Ticket;

// =========================================================================
// Collaborators
// =========================================================================

/// A request to create one remote issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRequest {
    pub project_key: String,
    pub issue_type: IssueType,
    pub summary: String,
    pub description: String,
    /// Direct parent (subtask parent field)
    pub parent_key: Option<String>,
    /// Epic link
    pub epic_key: Option<String>,
}

/// A successfully created remote issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub key: String,
}

/// Why a remote creation produced no issue
#[derive(Debug, Error)]
pub enum CreateError {
    #[error("request timed out")]
    Timeout,

    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response had no issue key")]
    MissingKey,
}

/// Creates issues in the remote tracker
pub trait IssueCreator {
    fn create(&mut self, request: &IssueRequest) -> Result<CreatedIssue, CreateError>;

    /// Browser URL for an issue key
    fn issue_url(&self, key: &str) -> String;
}

/// Receives a notification before each ticket is resolved
pub trait ProgressObserver {
    /// `current` is 1-based over the creation order
    fn notify(&mut self, current: usize, total: usize, summary: &str);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize, &str),
{
    fn notify(&mut self, current: usize, total: usize, summary: &str) {
        self(current, total, summary)
    }
}

/// Observer that ignores progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn notify(&mut self, _current: usize, _total: usize, _summary: &str) {}
}

/// Operator cancellation, checked between ticket creations
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Shared flag for signal handlers
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

/// Creator that makes no remote calls and hands out sequential fake keys
#[derive(Debug, Clone)]
pub struct DryRunCreator {
    project_key: String,
    next: u32,
}

impl DryRunCreator {
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            next: 1,
        }
    }
}

impl IssueCreator for DryRunCreator {
    fn create(&mut self, request: &IssueRequest) -> Result<CreatedIssue, CreateError> {
        let key = format!("{}-DRY{}", self.project_key, self.next);
        self.next += 1;
        tracing::debug!(
            key = %key,
            issue_type = %request.issue_type,
            parent = ?request.parent_key,
            epic = ?request.epic_key,
            "dry run"
        );
        Ok(CreatedIssue { key })
    }

    fn issue_url(&self, key: &str) -> String {
        format!("dry-run://{}", key)
    }
}

// =========================================================================
// Results
// =========================================================================

/// Per-ticket state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TicketState {
    Pending,
    Resolving,
    Created { key: String },
    Skipped,
    Failed,
}

impl TicketState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TicketState::Created { .. } | TicketState::Skipped | TicketState::Failed
        )
    }
}

impl std::fmt::Display for TicketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketState::Pending => write!(f, "pending"),
            TicketState::Resolving => write!(f, "resolving"),
            TicketState::Created { key } => write!(f, "created ({})", key),
            TicketState::Skipped => write!(f, "skipped"),
            TicketState::Failed => write!(f, "failed"),
        }
    }
}

/// Final state of one ticket, in plan order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketOutcome {
    pub index: usize,
    pub summary: String,
    #[serde(flatten)]
    pub state: TicketState,
}

/// A ticket created remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedTicket {
    pub key: String,
    /// The ticket's type label as written in the batch
    #[serde(rename = "type")]
    pub issue_type: String,
    pub summary: String,
    pub url: String,
    pub original_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Subtask had no created non-subtask ancestor
    MissingParent,
    /// Subtask under an epic was created as a task (informational)
    Promoted,
    /// The issue creator returned no issue
    CreationFailed,
}

/// A human-readable diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub kind: NoteKind,
    pub index: usize,
    pub message: String,
}

impl Note {
    fn missing_parent(ticket: &Ticket) -> Self {
        Self {
            kind: NoteKind::MissingParent,
            index: ticket.index,
            message: format!("Skipped subtask (missing parent): {}", ticket.summary),
        }
    }

    fn promoted(ticket: &Ticket) -> Self {
        Self {
            kind: NoteKind::Promoted,
            index: ticket.index,
            message: format!("Promoted subtask to Task under Epic: {}", ticket.summary),
        }
    }

    fn failed(ticket: &Ticket) -> Self {
        Self {
            kind: NoteKind::CreationFailed,
            index: ticket.index,
            message: format!("Failed to create: {}", ticket.summary),
        }
    }

    /// Promotions are advisory; everything else is a degraded outcome
    pub fn is_failure(&self) -> bool {
        self.kind != NoteKind::Promoted
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreationReport {
    pub created: Vec<CreatedTicket>,
    pub notes: Vec<Note>,
    pub outcomes: Vec<TicketOutcome>,
    pub cancelled: bool,
}

impl CreationReport {
    /// Note messages in creation order
    pub fn messages(&self) -> Vec<&str> {
        self.notes.iter().map(|n| n.message.as_str()).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| n.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn count(&self, state: fn(&TicketState) -> bool) -> usize {
        self.outcomes.iter().filter(|o| state(&o.state)).count()
    }

    /// `(index, key)` pairs for every created ticket
    pub fn keys(&self) -> impl Iterator<Item = (usize, &str)> {
        self.created
            .iter()
            .map(|c| (c.original_index, c.key.as_str()))
    }
}

// =========================================================================
// Linkage resolution
// =========================================================================

/// Effective type and links for one creation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linkage {
    pub issue_type: IssueType,
    pub parent_key: Option<String>,
    pub epic_key: Option<String>,
    pub promoted: bool,
}

/// Resolve linkage for `ticket`, or `None` if it must be skipped
///
/// Only subtasks can be skipped. Stories and tasks take at most an epic link;
/// a story/task parent is never turned into a direct parent link.
pub fn resolve_linkage(
    ticket: &Ticket,
    resolver: &AncestorResolver,
    keys: &HashMap<usize, String>,
) -> Option<Linkage> {
    let kind = ticket.kind();

    match kind {
        IssueType::Subtask => {
            let ancestor = ticket
                .parent_index
                .and_then(|p| resolver.first_non_subtask_ancestor(p))?;
            let key = keys.get(&ancestor)?.clone();

            if resolver.kind(ancestor) == Some(IssueType::Epic) {
                Some(Linkage {
                    issue_type: IssueType::Task,
                    parent_key: None,
                    epic_key: Some(key),
                    promoted: true,
                })
            } else {
                Some(Linkage {
                    issue_type: IssueType::Subtask,
                    parent_key: Some(key),
                    epic_key: None,
                    promoted: false,
                })
            }
        }
        IssueType::Epic => Some(Linkage {
            issue_type: kind,
            parent_key: None,
            epic_key: None,
            promoted: false,
        }),
        IssueType::Story | IssueType::Task => {
            let epic_key = ticket
                .parent_index
                .and_then(|p| resolver.nearest_epic_ancestor(p))
                .and_then(|epic| keys.get(&epic).cloned());
            Some(Linkage {
                issue_type: kind,
                parent_key: None,
                epic_key,
                promoted: false,
            })
        }
    }
}

/// Description with the acceptance criteria appended as a bullet list
pub fn format_description(description: &str, criteria: &[String]) -> String {
    let bullets: Vec<&str> = criteria
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    if bullets.is_empty() {
        return description.to_string();
    }

    let mut out = String::from(description);
    out.push_str("\n\nAcceptance Criteria:\n");
    for criterion in bullets {
        out.push_str("• ");
        out.push_str(criterion);
        out.push('\n');
    }
    out
}

// =========================================================================
// Executor
// =========================================================================

/// Runs a confirmed batch against an issue creator
#[derive(Debug, Clone)]
pub struct CreationExecutor {
    project_key: String,
    cancel: CancelFlag,
}

impl CreationExecutor {
    pub fn new(project_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// Create every ticket in plan order
    pub fn run(
        &self,
        tickets: &[Ticket],
        creator: &mut dyn IssueCreator,
        observer: &mut dyn ProgressObserver,
    ) -> CreationReport {
        let order = plan(tickets);
        let resolver = AncestorResolver::new(tickets);
        let total = tickets.len();

        let mut keys: HashMap<usize, String> = HashMap::new();
        let mut report = CreationReport {
            outcomes: order
                .iter()
                .map(|&pos| TicketOutcome {
                    index: tickets[pos].index,
                    summary: tickets[pos].summary.clone(),
                    state: TicketState::Pending,
                })
                .collect(),
            ..Default::default()
        };

        tracing::debug!(total, project = %self.project_key, "starting creation run");

        for (step, &pos) in order.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::warn!(remaining = total - step, "creation cancelled by operator");
                report.cancelled = true;
                break;
            }

            let ticket = &tickets[pos];
            observer.notify(step + 1, total, &ticket.summary);
            report.outcomes[step].state = TicketState::Resolving;

            let state = self.create_one(ticket, &resolver, &mut keys, creator, &mut report);
            report.outcomes[step].state = state;
        }

        report
    }

    fn create_one(
        &self,
        ticket: &Ticket,
        resolver: &AncestorResolver,
        keys: &mut HashMap<usize, String>,
        creator: &mut dyn IssueCreator,
        report: &mut CreationReport,
    ) -> TicketState {
        let Some(linkage) = resolve_linkage(ticket, resolver, keys) else {
            tracing::warn!(index = ticket.index, summary = %ticket.summary, "subtask has no created parent");
            report.notes.push(Note::missing_parent(ticket));
            return TicketState::Skipped;
        };

        if linkage.promoted {
            tracing::debug!(index = ticket.index, "promoting subtask under epic to task");
            report.notes.push(Note::promoted(ticket));
        }

        let request = IssueRequest {
            project_key: self.project_key.clone(),
            issue_type: linkage.issue_type,
            summary: ticket.summary.clone(),
            description: format_description(&ticket.description, &ticket.acceptance_criteria),
            parent_key: linkage.parent_key,
            epic_key: linkage.epic_key,
        };

        match creator.create(&request) {
            Ok(issue) => {
                tracing::info!(index = ticket.index, key = %issue.key, "created issue");
                keys.insert(ticket.index, issue.key.clone());
                report.created.push(CreatedTicket {
                    url: creator.issue_url(&issue.key),
                    key: issue.key.clone(),
                    issue_type: ticket.issue_type.clone(),
                    summary: ticket.summary.clone(),
                    original_index: ticket.index,
                });
                TicketState::Created { key: issue.key }
            }
            Err(e) => {
                tracing::warn!(index = ticket.index, summary = %ticket.summary, error = %e, "issue creation failed");
                report.notes.push(Note::failed(ticket));
                TicketState::Failed
            }
        }
    }
}
