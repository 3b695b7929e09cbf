//! Jira Cloud REST client

pub mod adf;
pub mod client;

pub use client::{JiraClient, JiraError, ProjectKind, ProjectSummary};
