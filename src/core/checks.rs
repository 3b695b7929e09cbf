//! Batch checks - predict degraded outcomes before anything is created
//!
//! None of these conditions stop a run. They are reported so a reviewer can fix
//! the batch while edits are still cheap.

use serde::Serialize;

use crate::core::ancestry::AncestorResolver;
use crate::core::issue_type::IssueType;
use crate::core::ticket::Ticket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum BatchIssue {
    /// Parent index does not name a ticket in the batch
    DanglingParent { index: usize, parent: usize },
    /// Walking up from this ticket revisits an index
    ParentCycle { index: usize },
    /// Type label not recognized; it will be created as a Task
    DefaultedType { index: usize, label: String },
    /// Subtask with no non-subtask ancestor; it will be skipped
    OrphanSubtask { index: usize },
    /// Story/Task under a Story/Task; only the epic link survives
    NestedLinkDropped { index: usize, parent: usize },
    /// Epics take no parent; the reference is ignored
    EpicParentIgnored { index: usize },
}

impl BatchIssue {
    pub fn index(&self) -> usize {
        match self {
            BatchIssue::DanglingParent { index, .. }
            | BatchIssue::ParentCycle { index }
            | BatchIssue::DefaultedType { index, .. }
            | BatchIssue::OrphanSubtask { index }
            | BatchIssue::NestedLinkDropped { index, .. }
            | BatchIssue::EpicParentIgnored { index } => *index,
        }
    }
}

impl std::fmt::Display for BatchIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Ticket numbers are shown 1-based, as in the review screen
        match self {
            BatchIssue::DanglingParent { index, parent } => write!(
                f,
                "#{}: parent #{} does not exist",
                index + 1,
                parent + 1
            ),
            BatchIssue::ParentCycle { index } => {
                write!(f, "#{}: parent references form a cycle", index + 1)
            }
            BatchIssue::DefaultedType { index, label } => write!(
                f,
                "#{}: unknown type '{}' will be created as Task",
                index + 1,
                label
            ),
            BatchIssue::OrphanSubtask { index } => write!(
                f,
                "#{}: subtask has no story, task or epic above it and will be skipped",
                index + 1
            ),
            BatchIssue::NestedLinkDropped { index, parent } => write!(
                f,
                "#{}: nesting under #{} is not linked remotely (only epic links are set)",
                index + 1,
                parent + 1
            ),
            BatchIssue::EpicParentIgnored { index } => {
                write!(f, "#{}: epics cannot have a parent; it is ignored", index + 1)
            }
        }
    }
}

/// Run every check over a batch
pub fn check_batch(tickets: &[Ticket]) -> Vec<BatchIssue> {
    let resolver = AncestorResolver::new(tickets);
    let mut issues = Vec::new();

    for ticket in tickets {
        let index = ticket.index;
        let kind = ticket.kind();

        if !IssueType::is_recognized(&ticket.issue_type) {
            issues.push(BatchIssue::DefaultedType {
                index,
                label: ticket.issue_type.clone(),
            });
        }

        if let Some(parent) = ticket.parent_index {
            if !resolver.contains(parent) {
                issues.push(BatchIssue::DanglingParent { index, parent });
            }
        }

        if resolver.has_cycle(index) {
            issues.push(BatchIssue::ParentCycle { index });
        }

        match kind {
            IssueType::Subtask => {
                let anchored = ticket
                    .parent_index
                    .and_then(|p| resolver.first_non_subtask_ancestor(p))
                    .is_some();
                if !anchored {
                    issues.push(BatchIssue::OrphanSubtask { index });
                }
            }
            IssueType::Epic => {
                if ticket.parent_index.is_some() {
                    issues.push(BatchIssue::EpicParentIgnored { index });
                }
            }
            IssueType::Story | IssueType::Task => {
                if let Some(parent) = ticket.parent_index {
                    if matches!(
                        resolver.kind(parent),
                        Some(IssueType::Story | IssueType::Task)
                    ) {
                        issues.push(BatchIssue::NestedLinkDropped { index, parent });
                    }
                }
            }
        }
    }

    issues
}
