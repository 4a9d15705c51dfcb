use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    InvalidConfiguration {
        #[from]
        source: ConfigError,
    },

    #[error("Placement {indices:?} references points outside a lattice of {lattice_size}")]
    PlacementOutOfRange {
        indices: Vec<usize>,
        lattice_size: usize,
    },
}
