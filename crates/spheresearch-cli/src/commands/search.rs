use crate::cli::SearchArgs;
use crate::config::PartialSearchConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use spheresearch::{
    engine::progress::ProgressReporter,
    workflows::{
        self,
        search::{SearchOptions, SearchOutcome},
    },
};
use std::io::Write;
use tracing::{info, warn};

pub async fn run(args: SearchArgs) -> Result<()> {
    let partial_config = PartialSearchConfig::from_optional_file(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;
    let options = search_options(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Searching {} point(s) on a {}x{} lattice (radius {}), {} with {} enumeration...",
        config.points,
        config.lattice.slices,
        config.lattice.stacks,
        config.lattice.radius,
        config.strategy,
        config.enumeration
    );
    info!("Invoking the core search workflow...");

    let outcome =
        tokio::task::block_in_place(|| workflows::search::run(&config, &options, &reporter))?;

    info!(
        evaluations = outcome.evaluations,
        status = %outcome.status,
        "Workflow finished."
    );
    write_outcome(&outcome, &mut std::io::stdout().lock())?;

    Ok(())
}

fn search_options(args: &SearchArgs) -> Result<SearchOptions> {
    let mut options = SearchOptions {
        max_evaluations: args.max_evaluations,
        ..SearchOptions::default()
    };
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            return Err(CliError::Argument(
                "--batch-size must be at least 1".to_string(),
            ));
        }
        options.batch_size = batch_size;
    }
    Ok(options)
}

/// Writes the completion report: `Completed.` followed by the optimal record.
fn write_outcome<W: Write>(outcome: &SearchOutcome, out: &mut W) -> std::io::Result<()> {
    match &outcome.optimal {
        Some(record) => {
            if outcome.is_complete() {
                writeln!(out, "Completed.")?;
            } else {
                writeln!(
                    out,
                    "Stopped after {} of {} placement(s); the result below is provisional.",
                    outcome.evaluations, outcome.total_combinations
                )?;
            }
            writeln!(out, "{}", record)
        }
        None => {
            warn!("Workflow finished without a finite measurement.");
            writeln!(
                out,
                "Warning: no placement produced a finite measurement after {} evaluation(s).",
                outcome.evaluations
            )
        }
    }
}
