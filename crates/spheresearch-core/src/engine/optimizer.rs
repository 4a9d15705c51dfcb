use super::config::{EnumerationMode, SearchConfig, SearchConfigBuilder};
use super::enumerator::{Advance, CombinationEnumerator};
use super::error::EngineError;
use super::state::{OptimalRecord, SearchStatus, StepReport};
use crate::core::lattice::Lattice;
use crate::core::measurement::{Measurement, Strategy};
use nalgebra::Point3;
use tracing::{debug, info, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluations performed by one call to [`Optimizer::step_many`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub evaluated: u64,
    /// `(evaluation, score)` for every strict improvement, in order.
    pub improvements: Vec<(u64, f64)>,
}

/// A single search session: owns the lattice, the enumerator and the optimal record.
///
/// Each call to [`step`](Self::step) evaluates at most one placement; the caller
/// decides the cadence. Independent searches are independent instances.
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: SearchConfig,
    lattice: Lattice,
    enumerator: CombinationEnumerator,
    status: SearchStatus,
    current: Option<Measurement>,
    optimal: Option<OptimalRecord>,
    evaluations: u64,
}

impl Optimizer {
    pub fn new(config: SearchConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let lattice = Lattice::generate(
            config.lattice.radius,
            config.lattice.slices,
            config.lattice.stacks,
        )?;
        let enumerator = CombinationEnumerator::new(lattice.len(), config.points)?;

        debug!(
            lattice_size = lattice.len(),
            points = config.points,
            strategy = %config.strategy,
            enumeration = %config.enumeration,
            "Optimizer configured."
        );

        Ok(Self {
            config,
            lattice,
            enumerator,
            status: SearchStatus::NotStarted,
            current: None,
            optimal: None,
            evaluations: 0,
        })
    }

    /// Builds an optimizer using the strategy's default enumeration mode.
    pub fn configure(
        radius: f64,
        slices: usize,
        stacks: usize,
        points: usize,
        strategy: Strategy,
    ) -> Result<Self, EngineError> {
        let config = SearchConfigBuilder::new()
            .radius(radius)
            .slices(slices)
            .stacks(stacks)
            .points(points)
            .strategy(strategy)
            .build()?;
        Self::new(config)
    }

    /// Evaluates the next placement.
    ///
    /// The first call evaluates the first combination. Once the enumerator is
    /// exhausted the search becomes [`SearchStatus::Completed`] and further calls
    /// do nothing. Calls while paused do nothing either.
    pub fn step(&mut self) -> StepReport {
        match self.status {
            SearchStatus::Completed | SearchStatus::Paused => self.snapshot(None, false),
            SearchStatus::NotStarted => {
                self.enumerator.reset();
                self.status = SearchStatus::Running;
                self.evaluate_current()
            }
            SearchStatus::Running => match self.advance() {
                Advance::Moved => self.evaluate_current(),
                Advance::Exhausted => {
                    self.complete();
                    self.snapshot(None, false)
                }
            },
        }
    }

    /// Performs up to `limit` evaluations, stopping early on completion or pause.
    ///
    /// With the `parallel` feature and exhaustive enumeration, placements are
    /// scored concurrently and folded into the optimal record in enumeration
    /// order, giving the same result as repeated [`step`](Self::step) calls.
    pub fn step_many(&mut self, limit: u64) -> BatchSummary {
        #[cfg(feature = "parallel")]
        if self.status == SearchStatus::Running
            && self.config.enumeration == EnumerationMode::Exhaustive
        {
            return self.step_batch_parallel(limit);
        }

        let mut summary = BatchSummary::default();
        while summary.evaluated < limit {
            let report = self.step();
            if report.current_score.is_none() {
                break;
            }
            summary.evaluated += 1;
            if report.improved {
                if let Some(score) = report.optimal_score {
                    summary.improvements.push((self.evaluations, score));
                }
            }
        }
        summary
    }

    #[cfg(feature = "parallel")]
    fn step_batch_parallel(&mut self, limit: u64) -> BatchSummary {
        let mut batch: Vec<Vec<usize>> = Vec::new();
        let mut exhausted = false;
        while (batch.len() as u64) < limit {
            match self.enumerator.advance_exhaustive() {
                Advance::Moved => batch.push(self.enumerator.indices().to_vec()),
                Advance::Exhausted => {
                    exhausted = true;
                    break;
                }
            }
        }

        let strategy = self.config.strategy;
        let lattice = &self.lattice;
        let measurements: Vec<Measurement> = batch
            .par_iter()
            .map(|indices| strategy.measure_points(&resolve(lattice, indices), lattice.radius()))
            .collect();

        let mut summary = BatchSummary::default();
        for (indices, measurement) in batch.into_iter().zip(measurements) {
            summary.evaluated += 1;
            if self.record(indices, measurement) {
                summary
                    .improvements
                    .push((self.evaluations, measurement.score));
            }
        }
        if exhausted {
            self.complete();
        }
        summary
    }

    /// Returns to [`SearchStatus::NotStarted`] and clears the optimal record.
    pub fn reset(&mut self) {
        self.enumerator.reset();
        self.status = SearchStatus::NotStarted;
        self.current = None;
        self.optimal = None;
        self.evaluations = 0;
        debug!("Optimizer reset.");
    }

    /// Suspends a running search. Returns whether the status changed.
    pub fn pause(&mut self) -> bool {
        if self.status != SearchStatus::Running {
            return false;
        }
        self.status = SearchStatus::Paused;
        debug!(evaluations = self.evaluations, "Search paused.");
        true
    }

    /// Resumes a paused search. Returns whether the status changed.
    pub fn resume(&mut self) -> bool {
        if self.status != SearchStatus::Paused {
            return false;
        }
        self.status = SearchStatus::Running;
        debug!(evaluations = self.evaluations, "Search resumed.");
        true
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn current_placement(&self) -> &[usize] {
        self.enumerator.indices()
    }

    pub fn current_points(&self) -> Vec<Point3<f64>> {
        resolve(&self.lattice, self.enumerator.indices())
    }

    pub fn current_measurement(&self) -> Option<&Measurement> {
        self.current.as_ref()
    }

    pub fn optimal(&self) -> Option<&OptimalRecord> {
        self.optimal.as_ref()
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Scores an arbitrary placement with this search's lattice and strategy,
    /// without touching the search state.
    pub fn measure_placement(&self, indices: &[usize]) -> Result<Measurement, EngineError> {
        self.config
            .strategy
            .measure(&self.lattice, indices)
            .ok_or_else(|| EngineError::PlacementOutOfRange {
                indices: indices.to_vec(),
                lattice_size: self.lattice.len(),
            })
    }

    /// Upper bound on the number of evaluations of a full search.
    pub fn total_combinations(&self) -> u64 {
        self.enumerator.total_combinations()
    }

    /// Whether another placement remains to be evaluated, without moving the
    /// enumerator.
    pub fn has_remaining(&self) -> bool {
        match self.status {
            SearchStatus::NotStarted => true,
            SearchStatus::Completed => false,
            SearchStatus::Running | SearchStatus::Paused => {
                let mut lookahead = self.enumerator.clone();
                next_placement(&mut lookahead, self.config.enumeration, self.current.as_ref())
                    == Advance::Moved
            }
        }
    }

    fn advance(&mut self) -> Advance {
        next_placement(
            &mut self.enumerator,
            self.config.enumeration,
            self.current.as_ref(),
        )
    }

    fn evaluate_current(&mut self) -> StepReport {
        let indices = self.enumerator.indices().to_vec();
        let points = resolve(&self.lattice, &indices);
        let measurement = self
            .config
            .strategy
            .measure_points(&points, self.lattice.radius());
        let improved = self.record(indices, measurement);
        self.snapshot(Some(measurement.score), improved)
    }

    fn record(&mut self, indices: Vec<usize>, measurement: Measurement) -> bool {
        self.evaluations += 1;
        self.current = Some(measurement);
        trace!(
            evaluation = self.evaluations,
            placement = ?indices,
            score = measurement.score,
            "Evaluated placement."
        );

        let incumbent = self.optimal.as_ref().map(OptimalRecord::score);
        if !self
            .config
            .strategy
            .is_improvement(measurement.score, incumbent)
        {
            return false;
        }

        info!(
            evaluation = self.evaluations,
            score = measurement.score,
            "Current optimal measurement: {}",
            measurement.score
        );
        self.optimal = Some(OptimalRecord {
            points: resolve(&self.lattice, &indices),
            indices,
            measurement,
            evaluation: self.evaluations,
        });
        true
    }

    fn complete(&mut self) {
        self.status = SearchStatus::Completed;
        match &self.optimal {
            Some(record) => info!(
                evaluations = self.evaluations,
                score = record.score(),
                placement = ?record.indices,
                "Search completed."
            ),
            None => info!(
                evaluations = self.evaluations,
                "Search completed without a scorable placement."
            ),
        }
    }

    fn snapshot(&self, current_score: Option<f64>, improved: bool) -> StepReport {
        StepReport {
            status: self.status,
            current_placement: self.enumerator.indices().to_vec(),
            current_score,
            optimal_placement: self.optimal.as_ref().map(|r| r.indices.clone()),
            optimal_score: self.optimal.as_ref().map(OptimalRecord::score),
            improved,
        }
    }
}

fn next_placement(
    enumerator: &mut CombinationEnumerator,
    mode: EnumerationMode,
    last: Option<&Measurement>,
) -> Advance {
    match (mode, last.and_then(|m| m.pivot)) {
        (EnumerationMode::PruneHinted, Some(pivot)) => enumerator.advance_with_prune_hint(pivot),
        _ => enumerator.advance_exhaustive(),
    }
}

fn resolve(lattice: &Lattice, indices: &[usize]) -> Vec<Point3<f64>> {
    indices.iter().map(|&i| lattice[i]).collect()
}
