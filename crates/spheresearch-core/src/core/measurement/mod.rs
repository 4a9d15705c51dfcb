//! # Measurement Module
//!
//! Scoring strategies that rate the quality of a placement of points on the sphere.
//!
//! Both strategies are pure functions of the placement's coordinates. They are
//! selected through the [`Strategy`] enum so the optimizer and enumerator stay
//! agnostic of which one is active.
//!
//! - **[`Strategy::MinPairwiseDistance`]**: maximize the smallest chordal
//!   distance between any two points (higher is better). Also reports the pivot
//!   used by prune-hinted enumeration.
//! - **[`Strategy::CircleRatio`]**: minimize the ratio between the smallest
//!   empty circumcircle's arc radius and the shortest arc distance (lower is better).

pub mod circle_ratio;
pub mod distance;

use crate::core::lattice::Lattice;
use crate::core::utils::geometry::Circle;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative margin a score must beat the incumbent by to count as better.
/// Absorbs rounding noise so that equal placements keep the earlier record.
pub const IMPROVEMENT_TOLERANCE: f64 = 1e-12;

/// Which quantity a search optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    #[serde(rename = "min-distance")]
    MinPairwiseDistance,
    #[serde(rename = "circle-ratio")]
    CircleRatio,
}

/// The outcome of scoring one placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub score: f64,
    /// Position (within the placement) of the later member of the closest
    /// pair. Only produced by [`Strategy::MinPairwiseDistance`].
    pub pivot: Option<usize>,
    /// Smallest empty circumcircle. Only produced by [`Strategy::CircleRatio`].
    pub circle: Option<Circle>,
}

impl Strategy {
    /// Smallest placement size the strategy can score.
    pub fn min_points(self) -> usize {
        match self {
            Strategy::MinPairwiseDistance => 2,
            Strategy::CircleRatio => 3,
        }
    }

    /// Whether the strategy produces a pivot usable for prune-hinted enumeration.
    pub fn supports_pruning(self) -> bool {
        matches!(self, Strategy::MinPairwiseDistance)
    }

    /// Whether a higher score is better.
    pub fn maximizes(self) -> bool {
        matches!(self, Strategy::MinPairwiseDistance)
    }

    /// Returns `true` if `candidate` strictly improves on `incumbent`.
    ///
    /// Non-finite candidates never improve anything; any finite candidate
    /// improves on an absent incumbent. Differences within
    /// [`IMPROVEMENT_TOLERANCE`] of the incumbent count as ties.
    pub fn is_improvement(self, candidate: f64, incumbent: Option<f64>) -> bool {
        if !candidate.is_finite() {
            return false;
        }
        let Some(best) = incumbent else {
            return true;
        };
        let margin = best.abs() * IMPROVEMENT_TOLERANCE;
        if self.maximizes() {
            candidate > best + margin
        } else {
            candidate < best - margin
        }
    }

    /// Scores a placement given as coordinates on a sphere of `sphere_radius`.
    pub fn measure_points(self, points: &[Point3<f64>], sphere_radius: f64) -> Measurement {
        match self {
            Strategy::MinPairwiseDistance => match distance::closest_pair(points) {
                Some(pair) => Measurement {
                    score: pair.distance,
                    pivot: Some(pair.second),
                    circle: None,
                },
                None => Measurement {
                    score: f64::NAN,
                    pivot: None,
                    circle: None,
                },
            },
            Strategy::CircleRatio => {
                let ratio = circle_ratio::circle_ratio(points, sphere_radius);
                Measurement {
                    score: ratio.score,
                    pivot: None,
                    circle: ratio.smallest_empty_circle,
                }
            }
        }
    }

    /// Scores the placement `indices` drawn from `lattice`.
    ///
    /// Returns `None` if any index lies outside the lattice.
    pub fn measure(self, lattice: &Lattice, indices: &[usize]) -> Option<Measurement> {
        let points = lattice.resolve(indices)?;
        Some(self.measure_points(&points, lattice.radius()))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::MinPairwiseDistance => write!(f, "min-distance"),
            Strategy::CircleRatio => write!(f, "circle-ratio"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improvement_direction_follows_strategy() {
        let max = Strategy::MinPairwiseDistance;
        let min = Strategy::CircleRatio;

        assert!(max.is_improvement(1.5, Some(1.0)));
        assert!(!max.is_improvement(1.0, Some(1.0)));
        assert!(!max.is_improvement(0.5, Some(1.0)));

        assert!(min.is_improvement(0.5, Some(1.0)));
        assert!(!min.is_improvement(1.0, Some(1.0)));
        assert!(!min.is_improvement(1.5, Some(1.0)));
    }

    #[test]
    fn rounding_noise_is_treated_as_a_tie() {
        let best = 1.2163468959387858;
        assert!(!Strategy::CircleRatio.is_improvement(1.2163468959387853, Some(best)));
        assert!(!Strategy::MinPairwiseDistance.is_improvement(best + 1e-15, Some(best)));
        assert!(Strategy::CircleRatio.is_improvement(best - 1e-6, Some(best)));
    }

    #[test]
    fn any_finite_score_improves_on_an_empty_record() {
        assert!(Strategy::MinPairwiseDistance.is_improvement(0.0, None));
        assert!(Strategy::CircleRatio.is_improvement(42.0, None));
    }

    #[test]
    fn non_finite_scores_never_improve() {
        for strategy in [Strategy::MinPairwiseDistance, Strategy::CircleRatio] {
            assert!(!strategy.is_improvement(f64::NAN, None));
            assert!(!strategy.is_improvement(f64::INFINITY, None));
            assert!(!strategy.is_improvement(f64::NEG_INFINITY, Some(1.0)));
        }
    }

    #[test]
    fn min_distance_measurement_reports_pivot() {
        let points = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
        ];
        let measurement = Strategy::MinPairwiseDistance.measure_points(&points, 1.0);

        assert!((measurement.score - 2.0f64.sqrt()).abs() < 1e-9);
        // Pairs (0,1) and (1,2) tie at sqrt(2); the later one wins.
        assert_eq!(measurement.pivot, Some(2));
        assert!(measurement.circle.is_none());
    }

    #[test]
    fn min_distance_measurement_on_lattice_indices() {
        let lattice = Lattice::generate(1.0, 4, 2).unwrap();
        let measurement = Strategy::MinPairwiseDistance
            .measure(&lattice, &[0, 5])
            .unwrap();

        assert!((measurement.score - 2.0).abs() < 1e-9);
        assert_eq!(measurement.pivot, Some(1));
    }

    #[test]
    fn circle_ratio_measurement_reports_circle() {
        let lattice = Lattice::generate(1.0, 4, 2).unwrap();
        let measurement = Strategy::CircleRatio.measure(&lattice, &[0, 1, 2]).unwrap();

        assert!(measurement.pivot.is_none());
        let circle = measurement.circle.unwrap();
        assert!((circle.radius - (2.0f64 / 3.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn measure_rejects_out_of_range_indices() {
        let lattice = Lattice::generate(1.0, 4, 2).unwrap();
        assert!(Strategy::CircleRatio.measure(&lattice, &[0, 1, 6]).is_none());
    }

    #[test]
    fn strategy_display_matches_serialized_names() {
        assert_eq!(Strategy::MinPairwiseDistance.to_string(), "min-distance");
        assert_eq!(Strategy::CircleRatio.to_string(), "circle-ratio");
    }
}
