//! Issue type classification
//!
//! Ticket types arrive as free text (from an analyzer or a human edit). They are
//! normalized into a closed set before any ordering or linkage decision is made.

use serde::{Deserialize, Serialize};

/// The closed set of work-item types the toolkit creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum IssueType {
    Epic,
    Story,
    #[default]
    Task,
    Subtask,
}

/// Alias table, keyed by the label with case and separators stripped
const ALIASES: &[(&str, IssueType)] = &[
    ("epic", IssueType::Epic),
    ("story", IssueType::Story),
    ("userstory", IssueType::Story),
    ("task", IssueType::Task),
    ("subtask", IssueType::Subtask),
];

/// Lowercase a label and drop whitespace, `-` and `_`
///
/// "Sub-task", "Sub task" and "subtask" all fold to "subtask".
fn fold(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl IssueType {
    /// All types in tier order
    pub fn all() -> &'static [IssueType] {
        &[
            IssueType::Epic,
            IssueType::Story,
            IssueType::Task,
            IssueType::Subtask,
        ]
    }

    /// Look a label up in the alias table without applying the default
    pub fn lookup(label: &str) -> Option<IssueType> {
        let folded = fold(label);
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == folded)
            .map(|(_, ty)| *ty)
    }

    /// Normalize a free-text label
    ///
    /// Unrecognized labels become `Task`. This is policy, not an error: a typo in
    /// the type field should still produce a ticket at the middle tier.
    pub fn normalize(label: &str) -> IssueType {
        Self::lookup(label).unwrap_or_default()
    }

    /// Whether the label is in the alias table
    pub fn is_recognized(label: &str) -> bool {
        Self::lookup(label).is_some()
    }

    /// Creation tier: Epic=0, Story/Task=1, Subtask=2
    pub fn tier(self) -> u8 {
        match self {
            IssueType::Epic => 0,
            IssueType::Story | IssueType::Task => 1,
            IssueType::Subtask => 2,
        }
    }

    /// Issue type name as the remote system spells it
    pub fn remote_name(self) -> &'static str {
        match self {
            IssueType::Epic => "Epic",
            IssueType::Story => "Story",
            IssueType::Task => "Task",
            IssueType::Subtask => "Subtask",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.remote_name())
    }
}

impl std::str::FromStr for IssueType {
    type Err = String;

    /// Strict parse, used for CLI input where a typo should be reported
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| format!("Unknown issue type: {}", s))
    }
}

/// Tier of a free-text label
pub fn tier(label: &str) -> u8 {
    IssueType::normalize(label).tier()
}

pub fn is_subtask(label: &str) -> bool {
    IssueType::normalize(label) == IssueType::Subtask
}

pub fn is_epic(label: &str) -> bool {
    IssueType::normalize(label) == IssueType::Epic
}
