use crate::core::lattice::{Lattice, validate_dimensions};
use crate::core::measurement::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How the combination enumerator moves from one placement to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnumerationMode {
    /// Visit every k-combination in lexicographic order.
    Exhaustive,
    /// Skip ahead past the closest pair's later member after each evaluation.
    /// A heuristic: it may skip the true optimum.
    PruneHinted,
}

impl Strategy {
    /// Prune-hinted when the strategy reports a pivot, exhaustive otherwise.
    pub fn default_enumeration(self) -> EnumerationMode {
        if self.supports_pruning() {
            EnumerationMode::PruneHinted
        } else {
            EnumerationMode::Exhaustive
        }
    }
}

impl fmt::Display for EnumerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumerationMode::Exhaustive => write!(f, "exhaustive"),
            EnumerationMode::PruneHinted => write!(f, "prune-hinted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeConfig {
    pub radius: f64,
    pub slices: usize,
    pub stacks: usize,
}

impl LatticeConfig {
    /// Number of lattice points, or `None` on overflow.
    pub fn size(&self) -> Option<usize> {
        Lattice::size_for(self.slices, self.stacks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub lattice: LatticeConfig,
    pub points: usize,
    pub strategy: Strategy,
    pub enumeration: EnumerationMode,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let LatticeConfig {
            radius,
            slices,
            stacks,
        } = self.lattice;
        let lattice_size = validate_dimensions(radius, slices, stacks)?;

        let min_points = self.strategy.min_points();
        if self.points < min_points {
            return Err(ConfigError::InvalidParameter {
                name: "points",
                reason: format!(
                    "strategy '{}' requires at least {} points, got {}",
                    self.strategy, min_points, self.points
                ),
            });
        }
        if self.points > lattice_size {
            return Err(ConfigError::InvalidParameter {
                name: "points",
                reason: format!(
                    "cannot choose {} points from a lattice of {}",
                    self.points, lattice_size
                ),
            });
        }
        if self.enumeration == EnumerationMode::PruneHinted && !self.strategy.supports_pruning() {
            return Err(ConfigError::InvalidParameter {
                name: "enumeration",
                reason: format!(
                    "strategy '{}' provides no pruning pivot; use '{}'",
                    self.strategy,
                    EnumerationMode::Exhaustive
                ),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    radius: Option<f64>,
    slices: Option<usize>,
    stacks: Option<usize>,
    points: Option<usize>,
    strategy: Option<Strategy>,
    enumeration: Option<EnumerationMode>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }
    pub fn slices(mut self, slices: usize) -> Self {
        self.slices = Some(slices);
        self
    }
    pub fn stacks(mut self, stacks: usize) -> Self {
        self.stacks = Some(stacks);
        self
    }
    pub fn points(mut self, points: usize) -> Self {
        self.points = Some(points);
        self
    }
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn enumeration(mut self, mode: EnumerationMode) -> Self {
        self.enumeration = Some(mode);
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let lattice = LatticeConfig {
            radius: self.radius.ok_or(ConfigError::MissingParameter("radius"))?,
            slices: self.slices.ok_or(ConfigError::MissingParameter("slices"))?,
            stacks: self.stacks.ok_or(ConfigError::MissingParameter("stacks"))?,
        };
        let strategy = self
            .strategy
            .ok_or(ConfigError::MissingParameter("strategy"))?;
        let config = SearchConfig {
            lattice,
            points: self.points.ok_or(ConfigError::MissingParameter("points"))?,
            strategy,
            enumeration: self
                .enumeration
                .unwrap_or_else(|| strategy.default_enumeration()),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn octahedron_builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new().radius(1.0).slices(4).stacks(2)
    }

    #[test]
    fn builder_fills_default_enumeration_from_strategy() {
        let config = octahedron_builder()
            .points(2)
            .strategy(Strategy::MinPairwiseDistance)
            .build()
            .unwrap();
        assert_eq!(config.enumeration, EnumerationMode::PruneHinted);

        let config = octahedron_builder()
            .points(3)
            .strategy(Strategy::CircleRatio)
            .build()
            .unwrap();
        assert_eq!(config.enumeration, EnumerationMode::Exhaustive);
    }

    #[test]
    fn builder_reports_missing_parameters() {
        let result = SearchConfigBuilder::new()
            .radius(1.0)
            .slices(4)
            .points(2)
            .strategy(Strategy::MinPairwiseDistance)
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("stacks")));

        let result = octahedron_builder().points(2).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("strategy")));
    }

    #[test]
    fn too_few_points_are_rejected_per_strategy() {
        let result = octahedron_builder()
            .points(1)
            .strategy(Strategy::MinPairwiseDistance)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "points", .. })
        ));

        let result = octahedron_builder()
            .points(2)
            .strategy(Strategy::CircleRatio)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "points", .. })
        ));
    }

    #[test]
    fn more_points_than_lattice_size_are_rejected() {
        let result = octahedron_builder()
            .points(7)
            .strategy(Strategy::MinPairwiseDistance)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "points", .. })
        ));

        let config = octahedron_builder()
            .points(6)
            .strategy(Strategy::MinPairwiseDistance)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn prune_hinted_enumeration_requires_pruning_strategy() {
        let result = octahedron_builder()
            .points(3)
            .strategy(Strategy::CircleRatio)
            .enumeration(EnumerationMode::PruneHinted)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "enumeration",
                ..
            })
        ));
    }

    #[test]
    fn overflowing_lattice_dimensions_are_rejected() {
        let result = SearchConfigBuilder::new()
            .radius(1.0)
            .slices(usize::MAX)
            .stacks(usize::MAX)
            .points(2)
            .strategy(Strategy::MinPairwiseDistance)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "slices", .. })
        ));
    }

    #[test]
    fn lattice_dimensions_are_validated() {
        let result = SearchConfigBuilder::new()
            .radius(-1.0)
            .slices(4)
            .stacks(2)
            .points(2)
            .strategy(Strategy::MinPairwiseDistance)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "radius", .. })
        ));

        let result = SearchConfigBuilder::new()
            .radius(1.0)
            .slices(4)
            .stacks(1)
            .points(2)
            .strategy(Strategy::MinPairwiseDistance)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "stacks", .. })
        ));
    }
}
