//! `jat init` command - Write Jira connection settings

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::core::config::Config;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Jira site URL (e.g. https://your-domain.atlassian.net)
    #[arg(long)]
    pub url: Option<String>,

    /// Account email
    #[arg(long)]
    pub email: Option<String>,

    /// Default project key
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Never prompt; use flags and existing settings only
    #[arg(long)]
    pub no_input: bool,
}

fn prompt(theme: &ColorfulTheme, label: &str, current: &str) -> Result<String> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(label);
    if !current.is_empty() {
        input = input.default(current.to_string());
    }
    input.interact_text().into_diagnostic()
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = Config::config_path().map_err(|e| miette::miette!("{}", e))?;
    let mut config = Config::load_file(&path).map_err(|e| miette::miette!("{}", e))?;
    let theme = ColorfulTheme::default();

    config.jira.url = match args.url {
        Some(url) => url,
        None if args.no_input => config.jira.url,
        None => prompt(&theme, "Jira URL", &config.jira.url)?,
    }
    .trim()
    .trim_end_matches('/')
    .to_string();

    config.jira.email = match args.email {
        Some(email) => email,
        None if args.no_input => config.jira.email,
        None => prompt(&theme, "Jira email", &config.jira.email)?,
    }
    .trim()
    .to_string();

    if let Some(project) = args.project {
        config.jira.project_key = Some(project.trim().to_uppercase());
    }

    if config.jira.url.is_empty() || config.jira.email.is_empty() {
        return Err(miette::miette!(
            help = "Pass --url and --email, or run without --no-input",
            "Jira URL and email are required"
        ));
    }

    config.save_to(&path).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Initialized configuration at {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    println!(
        "  Set {} in your environment; the token is never written to disk.",
        style("JIRA_API_TOKEN").yellow()
    );

    Ok(())
}
