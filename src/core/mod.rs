//! Core module - ticket hierarchy resolution and creation ordering

pub mod ancestry;
pub mod checks;
pub mod config;
pub mod executor;
pub mod issue_type;
pub mod loader;
pub mod planner;
pub mod ticket;

pub use ancestry::AncestorResolver;
pub use checks::{check_batch, BatchIssue};
pub use config::{Config, ConfigError};
pub use executor::{
    CancelFlag, CreateError, CreatedIssue, CreatedTicket, CreationExecutor, CreationReport,
    DryRunCreator, IssueCreator, IssueRequest, NoProgress, Note, NoteKind, ProgressObserver,
    TicketState,
};
pub use issue_type::IssueType;
pub use loader::{load_batch, save_batch};
pub use planner::plan;
pub use ticket::{BatchError, Ticket, TicketBatch, TicketEdit};
