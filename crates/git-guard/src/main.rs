mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, ColorMode, Commands};
use output::{OutputMode, Reporter};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`RUST_LOG` syntax).
const LOG_ENV: &str = "GIT_GUARD_LOG";

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Human
    };

    match cli.color {
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Auto => {}
    }

    let mut reporter = Reporter::new(mode);

    let success = match cli.command {
        Commands::PreCommit => commands::pre_commit::run_pre_commit(&mut reporter),
        Commands::PrePush { remote, url } => {
            commands::pre_push::run_pre_push(&remote, url.as_deref(), &mut reporter)
        }
        Commands::Install { force } => commands::install::run_install(force, &mut reporter),
        Commands::Completions { shell } => commands::completions::run_completions(shell),
    };

    reporter.finish();

    if !success {
        std::process::exit(1);
    }
}
