//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    create::CreateArgs, init::InitArgs, plan::PlanArgs, projects::ProjectsArgs,
    review::ReviewArgs, validate::ValidateArgs,
};

/// Jira Automation Toolkit - turn a reviewed batch of proposed tickets into a
/// linked Jira hierarchy
#[derive(Parser, Debug)]
#[command(name = "jat", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write Jira connection settings
    Init(InitArgs),

    /// List projects and boards you can create tickets in
    Projects(ProjectsArgs),

    /// Check a ticket batch for links that will not survive creation
    Validate(ValidateArgs),

    /// Show the order tickets would be created in
    Plan(PlanArgs),

    /// Interactively edit a ticket batch and save it
    Review(ReviewArgs),

    /// Create a ticket batch in Jira
    Create(CreateArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table for lists, YAML otherwise
    #[default]
    Auto,
    Table,
    Tsv,
    Csv,
    Json,
    Yaml,
}
