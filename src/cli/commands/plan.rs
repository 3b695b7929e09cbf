//! `jat plan` command - Show the creation order for a batch

use miette::Result;
use std::path::PathBuf;
use tabled::Tabled;

use crate::cli::helpers::{ticket_label, truncate_str};
use crate::cli::output::print_rows;
use crate::cli::GlobalOpts;
use crate::core::loader::load_batch;
use crate::core::planner::{plan_entries, PlanEntry};

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Batch file (YAML or JSON)
    pub batch: PathBuf,
}

#[derive(Tabled, serde::Serialize)]
struct PlanRow {
    #[tabled(rename = "STEP")]
    step: usize,
    #[tabled(rename = "TICKET")]
    ticket: String,
    #[tabled(rename = "TIER")]
    tier: u8,
    #[tabled(rename = "TYPE")]
    issue_type: String,
    #[tabled(rename = "SUMMARY")]
    summary: String,
}

impl From<PlanEntry> for PlanRow {
    fn from(e: PlanEntry) -> Self {
        Self {
            step: e.position,
            ticket: ticket_label(e.index),
            tier: e.tier,
            issue_type: e.issue_type,
            summary: truncate_str(&e.summary, 60),
        }
    }
}

pub fn run(args: PlanArgs, global: &GlobalOpts) -> Result<()> {
    let batch = load_batch(&args.batch)?;
    let rows: Vec<PlanRow> = plan_entries(batch.tickets())
        .into_iter()
        .map(PlanRow::from)
        .collect();

    print_rows(
        &rows,
        global.format,
        &["step", "ticket", "tier", "type", "summary"],
        |r| {
            vec![
                r.step.to_string(),
                r.ticket.clone(),
                r.tier.to_string(),
                r.issue_type.clone(),
                r.summary.clone(),
            ]
        },
    )
}
