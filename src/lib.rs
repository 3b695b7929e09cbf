//! JAT: Jira Automation Toolkit
//!
//! Resolves the parent/child hierarchy of a batch of proposed tickets, orders
//! them so parents are created before children, and creates them in Jira with
//! the right Epic and parent links.

pub mod cli;
pub mod core;
pub mod jira;
pub mod yaml;
