//! `jat create` command - Create a reviewed ticket batch in Jira

use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::truncate_str;
use crate::cli::progress::ConsoleProgress;
use crate::cli::review::{confirm_creation, review_loop, ReviewOutcome};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::executor::{
    CancelFlag, CreationExecutor, CreationReport, DryRunCreator, IssueCreator, NoteKind,
    TicketState,
};
use crate::core::loader::{load_batch, save_batch};
use crate::jira::JiraClient;

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Batch file (YAML or JSON)
    pub batch: PathBuf,

    /// Project key (default: configured project, or pick interactively)
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Skip the review screen and the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Skip the review screen but still confirm
    #[arg(long)]
    pub no_review: bool,

    /// Resolve and print everything without calling Jira
    #[arg(long)]
    pub dry_run: bool,

    /// Write the creation report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write created issue keys back into the batch file
    #[arg(long)]
    pub save_keys: bool,
}

#[derive(Tabled)]
struct CreatedRow {
    #[tabled(rename = "TYPE")]
    issue_type: String,
    #[tabled(rename = "KEY")]
    key: String,
    #[tabled(rename = "SUMMARY")]
    summary: String,
    #[tabled(rename = "URL")]
    url: String,
}

fn select_project(client: &JiraClient) -> Result<String> {
    let projects = client.projects().into_diagnostic()?;
    if projects.is_empty() {
        return Err(miette::miette!(
            "No projects found. Please check your Jira permissions."
        ));
    }
    let items: Vec<String> = projects
        .iter()
        .map(|p| format!("{:<10} {} ({})", p.key, p.name, p.kind))
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a project/board")
        .items(&items)
        .default(0)
        .interact()
        .into_diagnostic()?;
    Ok(projects[selection].key.clone())
}

/// Ctrl-C sets the flag; a second Ctrl-C exits immediately
fn install_cancel_handler(cancel: &CancelFlag) -> Result<()> {
    use signal_hook::consts::SIGINT;
    use signal_hook::flag;

    flag::register_conditional_shutdown(SIGINT, 1, cancel.handle()).into_diagnostic()?;
    flag::register(SIGINT, cancel.handle()).into_diagnostic()?;
    Ok(())
}

fn print_report(report: &CreationReport) {
    println!();
    println!("{}", style("Creation Report").bold().green());
    println!();

    if !report.created.is_empty() {
        let rows: Vec<CreatedRow> = report
            .created
            .iter()
            .map(|c| CreatedRow {
                issue_type: c.issue_type.clone(),
                key: c.key.clone(),
                summary: truncate_str(&c.summary, 50),
                url: c.url.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    let (info, problems): (Vec<_>, Vec<_>) =
        report.notes.iter().partition(|n| n.kind == NoteKind::Promoted);

    if !info.is_empty() {
        println!();
        for note in info {
            println!("  {} {}", style("i").cyan(), note);
        }
    }
    if !problems.is_empty() {
        println!();
        println!("{}", style("Errors:").bold().red());
        for note in &problems {
            println!("  {} {}", style("•").red(), style(note).red());
        }
    }

    println!();
    println!(
        "{} {}",
        style("Total created:").bold(),
        style(report.created.len()).green()
    );
    if !problems.is_empty() {
        println!("{} {}", style("Errors:").bold().red(), problems.len());
    }
    if report.cancelled {
        let pending = report.count(|s| matches!(s, TicketState::Pending));
        println!(
            "{} Cancelled; {} ticket(s) were not attempted. Created issues were kept.",
            style("!").yellow(),
            pending
        );
    }
}

pub fn run(args: CreateArgs, global: &GlobalOpts) -> Result<()> {
    let mut batch = load_batch(&args.batch)?;
    if batch.is_empty() {
        return Err(miette::miette!("{} contains no tickets", args.batch.display()));
    }

    let config = Config::load();

    let client = if args.dry_run {
        None
    } else {
        let client = JiraClient::new(&config).into_diagnostic()?;
        if !client.test_connection() {
            return Err(miette::miette!(
                help = "Check JIRA_URL, JIRA_EMAIL and JIRA_API_TOKEN",
                "Failed to connect to Jira at {}",
                client.base_url()
            ));
        }
        eprintln!("{} Connected to Jira", style("✓").green());
        Some(client)
    };

    let project_key = match args.project.or_else(|| config.jira.project_key.clone()) {
        Some(key) => key.trim().to_uppercase(),
        None => match &client {
            Some(client) => select_project(client)?,
            None => {
                return Err(miette::miette!(
                    "A project key is required; pass --project or set JIRA_PROJECT_KEY"
                ))
            }
        },
    };

    if !args.yes && !args.no_review && review_loop(&mut batch)? == ReviewOutcome::Abandoned {
        println!("{} Exiting without creating tickets.", style("!").yellow());
        return Ok(());
    }

    if !args.yes && !confirm_creation(batch.len(), &project_key)? {
        println!("{} Creation cancelled.", style("!").yellow());
        return Ok(());
    }

    let cancel = CancelFlag::new();
    install_cancel_handler(&cancel)?;
    let executor = CreationExecutor::new(&project_key).with_cancel(cancel);

    let mut creator: Box<dyn IssueCreator> = match client {
        Some(client) => Box::new(client),
        None => Box::new(DryRunCreator::new(&project_key)),
    };
    let report = executor.run(batch.tickets(), creator.as_mut(), &mut ConsoleProgress);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        _ => print_report(&report),
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
        fs::write(path, json).into_diagnostic()?;
    }

    if args.save_keys && !args.dry_run {
        batch.record_keys(report.keys());
        save_batch(&args.batch, &batch).into_diagnostic()?;
    }

    tracing::debug!(
        finished = report.count(TicketState::is_terminal),
        created = report.created.len(),
        "creation run complete"
    );

    Ok(())
}
