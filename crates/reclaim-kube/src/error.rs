//! Error types for the Kubernetes adapter

use thiserror::Error;

/// Errors raised while connecting to or talking with the API server
#[derive(Error, Debug)]
pub enum KubeError {
    /// The kubeconfig file could not be read or parsed
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// The requested context is not in the kubeconfig
    #[error("context '{0}' not found in kubeconfig")]
    ContextNotFound(String),

    /// Neither in-cluster nor kubeconfig settings were usable
    #[error("failed to infer cluster configuration: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    /// Building the HTTP client failed
    #[error("failed to create client for '{context}': {source}")]
    Client {
        /// Context the client was built for
        context: String,
        /// Underlying error
        #[source]
        source: kube::Error,
    },

    /// A request failed with a non-retryable error
    #[error("{0}")]
    Api(#[from] kube::Error),

    /// A list request kept failing with retryable errors
    #[error("failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
        /// Last error seen
        #[source]
        source: kube::Error,
    },
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, KubeError>;
