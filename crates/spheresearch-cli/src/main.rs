mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    install_panic_report()?;
    debug!(?cli, "Parsed command line.");

    if let Some(threads) = cli.threads {
        configure_thread_pool(threads)?;
    }

    match cli.command {
        Commands::Search(args) => commands::search::run(args).await,
        Commands::Lattice(args) => commands::lattice::run(args).await,
    }
}

/// Routes panic reports through the logger so they also land in `--log-file`.
fn install_panic_report() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook
        .install()
        .map_err(|e| CliError::setup("the error report hook", e))?;
    std::panic::set_hook(Box::new(move |info| {
        error!("{}", panic_hook.panic_report(info));
    }));
    Ok(())
}

/// Sizes the pool used by parallel batch evaluation.
fn configure_thread_pool(threads: usize) -> Result<()> {
    debug!(threads, "Configuring the evaluation thread pool.");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| CliError::setup("the evaluation thread pool", e))
}
