use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use jat::cli::commands::{create, init, plan, projects, review, validate};
use jat::cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default = if verbose { "jat=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Projects(args) => projects::run(args, &cli.global),
        Commands::Validate(args) => validate::run(args, &cli.global),
        Commands::Plan(args) => plan::run(args, &cli.global),
        Commands::Review(args) => review::run(args),
        Commands::Create(args) => create::run(args, &cli.global),
    }
}
