//! kube-reclaim Engine
//!
//! Finds finished Pods and Jobs that are old enough to remove, and deletes
//! them with a bounded pool of workers.
//!
//! # Overview
//!
//! A run has three phases:
//! - **Namespace resolution**: an explicit list, `default`, or every
//!   namespace minus an exclusion list
//! - **Scanning**: list each enabled kind per namespace with the configured
//!   selectors, then keep resources that are unprotected, in an included
//!   terminal state, and past the age threshold
//! - **Execution**: delete (or, in dry-run mode, only report) each candidate,
//!   producing exactly one outcome record per candidate
//!
//! The engine talks to the cluster only through
//! [`reclaim_domain::ClusterApi`], so every phase runs against a mock in
//! tests.
//!
//! # Usage
//!
//! ```no_run
//! use reclaim_engine::{cancel, ExecutionOptions, ReclaimConfig, Reclaimer};
//! # use reclaim_domain::ClusterApi;
//! # async fn run<C: ClusterApi + 'static>(cluster: C) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ReclaimConfig::builder()
//!     .older_than_str("24h")
//!     .kinds(["pod", "job"])
//!     .all_namespaces(["kube-system", "kube-public"])
//!     .build()?;
//! let reclaimer = Reclaimer::new(cluster, config);
//!
//! let candidates = reclaimer.find_candidates().await?;
//! let (handle, signal) = cancel::channel();
//! let mut outcomes = reclaimer.execute(candidates, ExecutionOptions::delete(10), signal);
//! while let Some(record) = outcomes.recv().await {
//!     println!("{}/{} deleted={}", record.namespace, record.name, record.deleted);
//! }
//! # drop(handle);
//! # Ok(())
//! # }
//! ```
//!
//! # Cancellation
//!
//! Cancelling through a [`cancel::CancelHandle`] stops new deletions. Deletes
//! already in flight finish; candidates still queued are reported with the
//! error `cancelled before deletion`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
mod error;
mod executor;
mod metrics;
mod namespaces;
mod reclaimer;
mod scanner;

#[cfg(test)]
mod mock;

pub use cancel::{CancelHandle, CancelSignal};
pub use config::{
    parse_age, ExecutionOptions, NamespaceScope, ReclaimConfig, ReclaimConfigBuilder, StatePolicy,
};
pub use error::{ConfigError, ReclaimError, Result};
pub use executor::{DeletionExecutor, OutcomeStream};
pub use metrics::ReclaimMetrics;
pub use namespaces::{filter_excluded, resolve_namespaces};
pub use reclaimer::Reclaimer;
pub use scanner::{evaluate, Scanner, SkipReason};
