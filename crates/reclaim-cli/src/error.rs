//! Error types for the CLI application.

use reclaim_engine::{ConfigError, ReclaimError};
use reclaim_kube::KubeError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors. Every variant is fatal for the invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid flag or config file value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Explicit config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        /// File that was requested
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this tool
    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        /// File that was parsed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// Connecting to or talking with the cluster failed
    #[error(transparent)]
    Kube(#[from] KubeError),

    /// Scanning failed
    #[error(transparent)]
    Engine(#[from] ReclaimError),

    /// The scan did not finish within `--timeout`
    #[error("scan timed out after {0:?}")]
    Timeout(Duration),

    /// Ctrl-C arrived before any deletion started
    #[error("interrupted before deletion started")]
    Interrupted,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
