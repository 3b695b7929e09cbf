//! `jat review` command - Edit a ticket batch interactively and save it

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::review::{review_loop, ReviewOutcome};
use crate::core::loader::{load_batch, save_batch};

#[derive(clap::Args, Debug)]
pub struct ReviewArgs {
    /// Batch file (YAML or JSON)
    pub batch: PathBuf,

    /// Write the reviewed batch here instead of overwriting the input
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ReviewArgs) -> Result<()> {
    let mut batch = load_batch(&args.batch)?;
    if batch.is_empty() {
        return Err(miette::miette!("{} contains no tickets", args.batch.display()));
    }

    match review_loop(&mut batch)? {
        ReviewOutcome::Abandoned => {
            println!("{} Review abandoned; nothing saved", style("!").yellow());
        }
        ReviewOutcome::Accepted => {
            let target = args.output.unwrap_or(args.batch);
            save_batch(&target, &batch).into_diagnostic()?;
            println!(
                "{} Saved {} ticket(s) to {}",
                style("✓").green(),
                batch.len(),
                style(target.display()).cyan()
            );
        }
    }

    Ok(())
}
