use crate::core::measurement::Measurement;
use nalgebra::Point3;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchStatus {
    #[default]
    NotStarted,
    Running,
    Paused,
    Completed,
}

impl SearchStatus {
    pub fn is_terminal(self) -> bool {
        self == SearchStatus::Completed
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchStatus::NotStarted => "not started",
            SearchStatus::Running => "running",
            SearchStatus::Paused => "paused",
            SearchStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// The best placement seen so far.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalRecord {
    pub indices: Vec<usize>,
    pub points: Vec<Point3<f64>>,
    pub measurement: Measurement,
    /// 1-based number of the evaluation that produced this record.
    pub evaluation: u64,
}

impl OptimalRecord {
    #[inline]
    pub fn score(&self) -> f64 {
        self.measurement.score
    }
}

/// Renders the completion report: one tab-separated line per point, then the score.
impl fmt::Display for OptimalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimal placing of points:")?;
        for point in &self.points {
            writeln!(f, "{}\t{}\t{}", point.x, point.y, point.z)?;
        }
        writeln!(f, "Optimal measurement:")?;
        write!(f, "{}", self.score())
    }
}

/// Snapshot returned by every call to `Optimizer::step`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub status: SearchStatus,
    pub current_placement: Vec<usize>,
    /// Score of the placement evaluated by this call, if one was evaluated.
    pub current_score: Option<f64>,
    pub optimal_placement: Option<Vec<usize>>,
    pub optimal_score: Option<f64>,
    /// Whether this call strictly improved the optimal record.
    pub improved: bool,
}
