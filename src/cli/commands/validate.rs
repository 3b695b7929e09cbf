//! `jat validate` command - Check a ticket batch before creation

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::checks::check_batch;
use crate::core::loader::load_batch;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Batch file (YAML or JSON)
    pub batch: PathBuf,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,

    /// Show summary only, don't show individual warnings
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let batch = load_batch(&args.batch)?;
    let issues = check_batch(batch.tickets());

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&issues).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&issues).into_diagnostic()?);
        }
        _ => {
            if !args.summary {
                for issue in &issues {
                    println!("{} {}", style("!").yellow(), issue);
                }
                if !issues.is_empty() {
                    println!();
                }
            }
            println!(
                "{} ticket(s) checked, {} warning(s)",
                style(batch.len()).cyan(),
                if issues.is_empty() {
                    style(issues.len()).green()
                } else {
                    style(issues.len()).yellow()
                }
            );
        }
    }

    if args.strict && !issues.is_empty() {
        return Err(miette::miette!(
            "{} warning(s) in {} (strict mode)",
            issues.len(),
            args.batch.display()
        ));
    }

    Ok(())
}
