//! Error types for reclaim operations

use reclaim_domain::{ParseKindError, ResourceKind};
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, ReclaimError>;

/// Errors that abort a reclaim run
///
/// Per-candidate delete failures are not errors at this level; they travel in
/// the outcome records.
#[derive(Error, Debug)]
pub enum ReclaimError {
    /// Listing namespaces failed
    #[error("failed to list namespaces: {0}")]
    Namespaces(String),

    /// Listing pods or jobs in a namespace failed
    #[error("failed to list {kind}s in namespace '{namespace}': {message}")]
    List {
        /// Kind being listed
        kind: ResourceKind,
        /// Namespace being listed
        namespace: String,
        /// Underlying cluster error
        message: String,
    },
}

/// Configuration errors, raised before any scan starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Age threshold could not be parsed
    #[error("invalid age threshold '{value}': {reason}")]
    InvalidDuration {
        /// The rejected input
        value: String,
        /// Parser message
        reason: String,
    },

    /// A kind outside {pod, job} was requested
    #[error(transparent)]
    UnknownKind(#[from] ParseKindError),

    /// No kinds were requested at all
    #[error("at least one resource kind is required")]
    NoKinds,

    /// The protect label has no key
    #[error("invalid protect label '{0}': expected key[=value]")]
    InvalidProtectLabel(String),
}
