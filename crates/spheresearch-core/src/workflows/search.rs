use crate::engine::config::SearchConfig;
use crate::engine::error::EngineError;
use crate::engine::optimizer::Optimizer;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{OptimalRecord, SearchStatus};
use tracing::{info, instrument, warn};

const DEFAULT_BATCH_SIZE: u64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Stop after this many evaluations even if the search is not complete.
    pub max_evaluations: Option<u64>,
    /// Evaluations per call to [`Optimizer::step_many`].
    pub batch_size: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_evaluations: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    pub evaluations: u64,
    pub total_combinations: u64,
    pub lattice_size: usize,
    pub optimal: Option<OptimalRecord>,
}

impl SearchOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Completed
    }
}

#[instrument(skip_all, name = "search_workflow")]
pub fn run(
    config: &SearchConfig,
    options: &SearchOptions,
    reporter: &ProgressReporter,
) -> Result<SearchOutcome, EngineError> {
    // === Phase 1: Lattice generation and validation ===
    reporter.report(Progress::PhaseStart {
        name: "Generating Lattice",
    });
    let mut optimizer = Optimizer::new(*config)?;
    let total_combinations = optimizer.total_combinations();
    info!(
        lattice_size = optimizer.lattice().len(),
        points = config.points,
        strategy = %config.strategy,
        enumeration = %config.enumeration,
        total_combinations,
        "Lattice generated."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Enumeration ===
    reporter.report(Progress::PhaseStart {
        name: "Searching Placements",
    });
    reporter.report(Progress::TaskStart {
        total_steps: options
            .max_evaluations
            .map_or(total_combinations, |max| max.min(total_combinations)),
    });

    let batch_size = options.batch_size.max(1);
    while optimizer.status() != SearchStatus::Completed {
        let limit = match options.max_evaluations {
            Some(max) => batch_size.min(max.saturating_sub(optimizer.evaluations())),
            None => batch_size,
        };
        if limit == 0 {
            // The limit may land exactly on the last placement.
            if !optimizer.has_remaining() {
                optimizer.step();
            }
            break;
        }

        let summary = optimizer.step_many(limit);
        for (evaluation, score) in summary.improvements {
            reporter.report(Progress::Improvement { evaluation, score });
        }
        if summary.evaluated > 0 {
            reporter.report(Progress::TaskIncrement {
                amount: summary.evaluated,
            });
        } else {
            optimizer.step();
        }
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Results ===
    if optimizer.status() == SearchStatus::Completed {
        reporter.report(Progress::Message(format!(
            "Completed after {} evaluation(s).",
            optimizer.evaluations()
        )));
    } else {
        warn!(
            evaluations = optimizer.evaluations(),
            "Evaluation limit reached before the search completed."
        );
        reporter.report(Progress::Message(format!(
            "Stopped after {} of at most {} evaluation(s).",
            optimizer.evaluations(),
            total_combinations
        )));
    }

    Ok(SearchOutcome {
        status: optimizer.status(),
        evaluations: optimizer.evaluations(),
        total_combinations,
        lattice_size: optimizer.lattice().len(),
        optimal: optimizer.optimal().cloned(),
    })
}
