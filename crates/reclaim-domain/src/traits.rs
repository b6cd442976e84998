//! Trait definitions for external interactions
//!
//! The engine talks to the cluster only through [`ClusterApi`]. The live
//! implementation lives in `reclaim-kube`; tests use in-memory mocks.

use crate::resource::{JobSnapshot, ListFilter, PodSnapshot};
use async_trait::async_trait;
use std::fmt::Display;

/// Access to the cluster API used for scanning and deletion
///
/// Shared between worker tasks, so implementations must be `Send + Sync`.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Error type for cluster operations
    type Error: Display + Send + Sync + 'static;

    /// List the names of every namespace in the cluster, in API order
    async fn list_namespaces(&self) -> Result<Vec<String>, Self::Error>;

    /// List pods in a namespace matching the selectors
    async fn list_pods(
        &self,
        namespace: &str,
        filter: &ListFilter,
    ) -> Result<Vec<PodSnapshot>, Self::Error>;

    /// List jobs in a namespace matching the selectors
    async fn list_jobs(
        &self,
        namespace: &str,
        filter: &ListFilter,
    ) -> Result<Vec<JobSnapshot>, Self::Error>;

    /// Delete a pod with foreground propagation
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), Self::Error>;

    /// Delete a job with foreground propagation, so its pods go first
    async fn delete_job(&self, namespace: &str, name: &str) -> Result<(), Self::Error>;
}
