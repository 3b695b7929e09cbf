//! Ticket batch - the flat, user-edited list of proposed work items
//!
//! A batch is produced by an upstream analyzer (or by hand), reviewed and edited
//! interactively, and finally handed read-only to the creation executor.
//! Indices are always dense `0..len` and match each ticket's position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::issue_type::IssueType;

/// A proposed work item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Local index, equal to the ticket's position in its batch
    pub index: usize,

    /// Free-text type label, normalized on read
    #[serde(rename = "type")]
    pub issue_type: String,

    /// Short title
    pub summary: String,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// Acceptance criteria, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptance_criteria: Vec<String>,

    /// Local index of the parent ticket; may dangle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<usize>,

    /// Remote issue key, set once after successful creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Ticket {
    pub fn new(index: usize, issue_type: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            index,
            issue_type: issue_type.into(),
            summary: summary.into(),
            description: String::new(),
            acceptance_criteria: Vec::new(),
            parent_index: None,
            key: None,
        }
    }

    pub fn with_parent(mut self, parent_index: usize) -> Self {
        self.parent_index = Some(parent_index);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_criteria<I, S>(mut self, criteria: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acceptance_criteria = criteria.into_iter().map(Into::into).collect();
        self
    }

    /// Normalized type
    pub fn kind(&self) -> IssueType {
        IssueType::normalize(&self.issue_type)
    }

    /// Record the remote key. Returns false if a key was already set.
    pub fn assign_key(&mut self, key: impl Into<String>) -> bool {
        if self.key.is_some() {
            return false;
        }
        self.key = Some(key.into());
        true
    }
}

/// A ticket record as an analyzer emits it
///
/// Everything but the summary is optional; `parent_index` may be negative or
/// point nowhere. Any `index` in the input is ignored and reassigned from the
/// record's position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub acceptance_criteria: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<i64>,

    /// Remote key recorded by an earlier run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Partial edit applied during review; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct TicketEdit {
    pub issue_type: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub acceptance_criteria: Option<Vec<String>>,
    /// `Some(None)` clears the parent
    pub parent_index: Option<Option<usize>>,
}

/// Errors from batch editing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("No ticket at position {index} (batch has {len} tickets)")]
    NoSuchTicket { index: usize, len: usize },
}

/// An ordered batch of tickets with dense indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketBatch {
    tickets: Vec<Ticket>,
}

impl TicketBatch {
    /// Build a batch from tickets, reassigning indices from position
    pub fn new(tickets: Vec<Ticket>) -> Self {
        let mut batch = Self { tickets };
        batch.reindex();
        batch
    }

    /// Build a batch from analyzer drafts, filling defaults
    pub fn from_drafts(drafts: Vec<TicketDraft>) -> Self {
        let tickets = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| Ticket {
                index,
                issue_type: draft
                    .issue_type
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "Task".to_string()),
                summary: draft
                    .summary
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "Untitled".to_string()),
                description: draft.description.unwrap_or_default(),
                acceptance_criteria: draft.acceptance_criteria,
                // A negative parent can never resolve; treat it as absent
                parent_index: draft.parent_index.and_then(|p| usize::try_from(p).ok()),
                key: draft.key.filter(|k| !k.trim().is_empty()),
            })
            .collect();
        Self { tickets }
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn get(&self, index: usize) -> Option<&Ticket> {
        self.tickets.get(index)
    }

    /// Apply a partial edit to the ticket at `index`
    pub fn edit(&mut self, index: usize, edit: TicketEdit) -> Result<&Ticket, BatchError> {
        let len = self.tickets.len();
        let ticket = self
            .tickets
            .get_mut(index)
            .ok_or(BatchError::NoSuchTicket { index, len })?;

        if let Some(issue_type) = edit.issue_type {
            ticket.issue_type = issue_type;
        }
        if let Some(summary) = edit.summary {
            ticket.summary = summary;
        }
        if let Some(description) = edit.description {
            ticket.description = description;
        }
        if let Some(criteria) = edit.acceptance_criteria {
            ticket.acceptance_criteria = criteria;
        }
        if let Some(parent) = edit.parent_index {
            ticket.parent_index = parent;
        }

        Ok(ticket)
    }

    /// Remove the ticket at `index` and renumber the survivors
    ///
    /// Parents that pointed at the removed ticket become unresolved. Parents that
    /// pointed at a later live ticket follow it to its new index. References that
    /// were already dangling are left alone and keep dangling.
    pub fn delete(&mut self, index: usize) -> Result<Ticket, BatchError> {
        let len = self.tickets.len();
        if index >= len {
            return Err(BatchError::NoSuchTicket { index, len });
        }

        let removed = self.tickets.remove(index);
        for ticket in &mut self.tickets {
            ticket.parent_index = match ticket.parent_index {
                Some(p) if p == index => None,
                Some(p) if p > index && p < len => Some(p - 1),
                other => other,
            };
        }
        self.reindex();

        tracing::debug!(index, summary = %removed.summary, "deleted ticket");
        Ok(removed)
    }

    /// Reset every ticket's index to its position
    pub fn reindex(&mut self) {
        for (position, ticket) in self.tickets.iter_mut().enumerate() {
            ticket.index = position;
        }
    }

    /// Record remote keys for created tickets
    pub fn record_keys<'a, I>(&mut self, created: I)
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        for (index, key) in created {
            if let Some(ticket) = self.tickets.get_mut(index) {
                if !ticket.assign_key(key) {
                    tracing::warn!(index, key, "ticket already has a remote key");
                }
            }
        }
    }

    /// Whether `index` refers to a live ticket
    pub fn contains(&self, index: usize) -> bool {
        index < self.tickets.len()
    }
}

/// Split comma-separated acceptance criteria into trimmed, non-empty entries
pub fn parse_criteria(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
