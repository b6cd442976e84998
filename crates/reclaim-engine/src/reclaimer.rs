//! Core reclaimer: namespace resolution, scanning and deletion

use crate::cancel::CancelSignal;
use crate::config::{ExecutionOptions, ReclaimConfig};
use crate::error::Result;
use crate::executor::{DeletionExecutor, OutcomeStream};
use crate::namespaces;
use crate::scanner::Scanner;
use crate::ReclaimMetrics;
use reclaim_domain::{Candidate, ClusterApi, OutcomeRecord};
use std::sync::Arc;
use std::time::Instant;

/// Reclaims finished Pods and Jobs from a cluster
///
/// Responsible for:
/// - Resolving which namespaces to scan
/// - Finding candidates per the configured kinds, states, age and protect label
/// - Deleting them (or reporting them in dry-run mode) with bounded concurrency
///
/// # Examples
///
/// ```no_run
/// use reclaim_engine::{cancel, ExecutionOptions, ReclaimConfig, Reclaimer};
/// # use reclaim_domain::ClusterApi;
/// # async fn run<C: ClusterApi + 'static>(cluster: C) -> Result<(), Box<dyn std::error::Error>> {
/// let config = ReclaimConfig::builder().older_than_str("6h").build()?;
/// let reclaimer = Reclaimer::new(cluster, config);
///
/// let (_handle, signal) = cancel::channel();
/// let (records, metrics) = reclaimer.sweep(ExecutionOptions::default(), signal).await?;
/// println!("{} records, {}", records.len(), metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct Reclaimer<C> {
    cluster: Arc<C>,
    config: ReclaimConfig,
}

impl<C: ClusterApi + 'static> Reclaimer<C> {
    /// Create a reclaimer owning its cluster handle
    pub fn new(cluster: C, config: ReclaimConfig) -> Self {
        Self::with_shared(Arc::new(cluster), config)
    }

    /// Create a reclaimer over an already shared cluster handle
    pub fn with_shared(cluster: Arc<C>, config: ReclaimConfig) -> Self {
        Self { cluster, config }
    }

    /// The configuration this reclaimer runs with
    pub fn config(&self) -> &ReclaimConfig {
        &self.config
    }

    /// The namespaces a scan would cover
    pub async fn resolve_namespaces(&self) -> Result<Vec<String>> {
        namespaces::resolve_namespaces(self.cluster.as_ref(), &self.config.namespaces).await
    }

    /// Find every candidate; nothing is deleted
    pub async fn find_candidates(&self) -> Result<Vec<Candidate>> {
        let namespaces = self.resolve_namespaces().await?;
        Scanner::new(self.cluster.as_ref(), &self.config)
            .scan(&namespaces)
            .await
    }

    /// Start deleting candidates and stream the outcomes
    pub fn execute(
        &self,
        candidates: Vec<Candidate>,
        options: ExecutionOptions,
        cancel: CancelSignal,
    ) -> OutcomeStream {
        DeletionExecutor::new(Arc::clone(&self.cluster), options).spawn(candidates, cancel)
    }

    /// Perform a complete run: resolve, scan, execute, collect
    ///
    /// Only namespace or listing failures are returned as errors; per
    /// candidate failures are in the records.
    pub async fn sweep(
        &self,
        options: ExecutionOptions,
        cancel: CancelSignal,
    ) -> Result<(Vec<OutcomeRecord>, ReclaimMetrics)> {
        let start = Instant::now();

        let candidates = self.find_candidates().await?;
        let records = self.execute(candidates, options, cancel).collect_all().await;

        let mut metrics = ReclaimMetrics::from_records(&records);
        metrics.elapsed = start.elapsed();
        tracing::info!(
            records = records.len(),
            deleted = metrics.total_deleted(),
            failed = metrics.total_failed(),
            cancelled = metrics.cancelled,
            dry_run = options.dry_run,
            "Sweep completed"
        );
        Ok((records, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReclaimError;
    use crate::mock::{hours, job, pod, MockCluster};
    use reclaim_domain::ResourceKind;

    fn cluster() -> MockCluster {
        MockCluster::new()
            .with_namespaces(&["default", "kube-system", "team"])
            .with_pod(pod("default", "done", "Succeeded", None, hours(30), &[]))
            .with_pod(pod("kube-system", "sys", "Failed", None, hours(30), &[]))
            .with_pod(pod("team", "keep-me", "Failed", None, hours(30), &[("keep", "true")]))
            .with_job(job("team", "batch", "Failed", hours(30)))
    }

    #[tokio::test]
    async fn test_default_scope_scans_default_only() {
        let reclaimer = Reclaimer::new(cluster(), ReclaimConfig::default());

        let candidates = reclaimer.find_candidates().await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "done");
    }

    #[tokio::test]
    async fn test_sweep_dry_run() {
        let config = ReclaimConfig::builder()
            .all_namespaces(["kube-system"])
            .build()
            .unwrap();
        let shared = Arc::new(cluster());
        let reclaimer = Reclaimer::with_shared(shared.clone(), config);

        let (records, metrics) = reclaimer
            .sweep(ExecutionOptions::default(), CancelSignal::never())
            .await
            .unwrap();

        let mut names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["batch", "done"]);
        assert_eq!(metrics.total_would_delete(), 2);
        assert!(shared.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_deletes() {
        let config = ReclaimConfig::builder()
            .namespaces(["team"])
            .build()
            .unwrap();
        let shared = Arc::new(cluster());
        let reclaimer = Reclaimer::with_shared(shared.clone(), config);

        let (records, metrics) = reclaimer
            .sweep(ExecutionOptions::delete(2), CancelSignal::never())
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(metrics.total_deleted(), 1);
        assert_eq!(
            shared.deleted(),
            vec![(ResourceKind::Job, "team".to_string(), "batch".to_string())]
        );
    }

    #[tokio::test]
    async fn test_sweep_propagates_namespace_failure() {
        let config = ReclaimConfig::builder().all_namespaces(Vec::<String>::new()).build().unwrap();
        let reclaimer = Reclaimer::new(MockCluster::new().fail_namespace_list("unauthorized"), config);

        let err = reclaimer
            .sweep(ExecutionOptions::delete(1), CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, ReclaimError::Namespaces(_)));
    }
}
