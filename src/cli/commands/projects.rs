//! `jat projects` command - List projects and boards

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::Tabled;

use crate::cli::output::print_rows;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::jira::{JiraClient, ProjectKind, ProjectSummary};

#[derive(clap::Args, Debug)]
pub struct ProjectsArgs {
    /// Show projects only, not boards
    #[arg(long)]
    pub no_boards: bool,
}

#[derive(Tabled, serde::Serialize)]
struct ProjectRow {
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    kind: String,
}

impl From<ProjectSummary> for ProjectRow {
    fn from(p: ProjectSummary) -> Self {
        Self {
            key: p.key,
            name: p.name,
            kind: p.kind.to_string(),
        }
    }
}

pub fn run(args: ProjectsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let client = JiraClient::new(&config).into_diagnostic()?;

    let rows: Vec<ProjectRow> = client
        .projects()
        .into_diagnostic()?
        .into_iter()
        .filter(|p| !args.no_boards || p.kind == ProjectKind::Project)
        .map(ProjectRow::from)
        .collect();

    if rows.is_empty() {
        println!(
            "{} No projects found. Check your Jira permissions.",
            style("!").yellow()
        );
        return Ok(());
    }

    print_rows(&rows, global.format, &["key", "name", "type"], |r| {
        vec![r.key.clone(), r.name.clone(), r.kind.clone()]
    })
}
