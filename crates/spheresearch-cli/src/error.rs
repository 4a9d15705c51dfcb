use spheresearch::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Lattice generation, scoring, or the search loop failed.
    #[error(transparent)]
    Search(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file '{path}': {source}", path = path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    /// A process-wide facility (logger, thread pool, report hook) could not be installed.
    #[error("Failed to set up {what}: {source}")]
    Setup {
        what: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl CliError {
    pub fn setup(what: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Setup {
            what,
            source: source.into(),
        }
    }
}
