//! kube-reclaim Kubernetes adapter
//!
//! Implements [`reclaim_domain::ClusterApi`] for a live API server using
//! kube-rs. Lists are paginated and retried with exponential backoff on
//! transient failures (connection errors, 429, 503, 504). Deletes use
//! foreground propagation and are never retried.
//!
//! # Usage
//!
//! ```no_run
//! use reclaim_kube::KubeCluster;
//! use reclaim_domain::{ClusterApi, ListFilter};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let cluster = KubeCluster::connect(Some("staging")).await?;
//! let pods = cluster.list_pods("default", &ListFilter::default()).await?;
//! println!("{} pods", pods.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
pub mod convert;
mod error;

pub use client::{is_retryable, KubeCluster};
pub use error::{KubeError, Result};
