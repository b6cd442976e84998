//! Candidate discovery
//!
//! Walks the resolved namespaces, lists each enabled kind with the configured
//! selectors, and keeps every resource that passes the four checks in order:
//! protect label, state classification, state inclusion, age.

use crate::config::ReclaimConfig;
use crate::error::{ReclaimError, Result};
use reclaim_domain::classify::{job_reference_time, job_state, pod_reference_time, pod_state};
use reclaim_domain::{
    Candidate, ClusterApi, LifecycleState, ListFilter, ResourceKind, ResourceMeta,
};
use std::time::SystemTime;

/// Why a listed resource did not become a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Carries the protect label
    Protected,
    /// State is not one of the included terminal states
    StateExcluded,
    /// Reference time is more recent than the cutoff
    TooYoung,
    /// Neither a status timestamp nor a creation timestamp is set
    NoReferenceTime,
}

/// Decide whether one resource is a candidate
///
/// A resource whose age equals the threshold exactly is a candidate. A
/// reference time in the future counts as too young.
pub fn evaluate(
    config: &ReclaimConfig,
    kind: ResourceKind,
    namespace: &str,
    meta: &ResourceMeta,
    state: LifecycleState,
    reference: Option<SystemTime>,
    now: SystemTime,
) -> std::result::Result<Candidate, SkipReason> {
    if config
        .protect
        .as_ref()
        .is_some_and(|label| label.protects(&meta.labels))
    {
        return Err(SkipReason::Protected);
    }

    if !config.states.includes(&state) {
        return Err(SkipReason::StateExcluded);
    }

    let reference = reference.ok_or(SkipReason::NoReferenceTime)?;
    let age = now
        .duration_since(reference)
        .map_err(|_| SkipReason::TooYoung)?;
    if age < config.older_than {
        return Err(SkipReason::TooYoung);
    }

    Ok(Candidate {
        kind,
        namespace: namespace.to_string(),
        name: meta.name.clone(),
        state,
        age,
    })
}

/// Lists resources and turns them into candidates
pub struct Scanner<'a, C: ClusterApi> {
    cluster: &'a C,
    config: &'a ReclaimConfig,
}

impl<'a, C: ClusterApi> Scanner<'a, C> {
    /// Create a scanner over a cluster with the given configuration
    pub fn new(cluster: &'a C, config: &'a ReclaimConfig) -> Self {
        Self { cluster, config }
    }

    /// Scan the namespaces using the current time
    pub async fn scan(&self, namespaces: &[String]) -> Result<Vec<Candidate>> {
        self.scan_at(namespaces, SystemTime::now()).await
    }

    /// Scan the namespaces, measuring ages against `now`
    ///
    /// Pods in every namespace come first, then jobs in every namespace. The
    /// first listing error aborts the scan.
    pub async fn scan_at(&self, namespaces: &[String], now: SystemTime) -> Result<Vec<Candidate>> {
        let filter = ListFilter::new(
            self.config.label_selector.as_deref(),
            self.config.field_selector.as_deref(),
        );
        let mut candidates = Vec::new();

        if self.config.includes_kind(ResourceKind::Pod) {
            for namespace in namespaces {
                let pods = self
                    .cluster
                    .list_pods(namespace, &filter)
                    .await
                    .map_err(|e| list_error(ResourceKind::Pod, namespace, e))?;
                tracing::debug!(namespace = %namespace, count = pods.len(), "Listed pods");

                for pod in &pods {
                    self.keep(
                        &mut candidates,
                        ResourceKind::Pod,
                        namespace,
                        &pod.meta,
                        pod_state(pod),
                        pod_reference_time(pod),
                        now,
                    );
                }
            }
        }

        if self.config.includes_kind(ResourceKind::Job) {
            for namespace in namespaces {
                let jobs = self
                    .cluster
                    .list_jobs(namespace, &filter)
                    .await
                    .map_err(|e| list_error(ResourceKind::Job, namespace, e))?;
                tracing::debug!(namespace = %namespace, count = jobs.len(), "Listed jobs");

                for job in &jobs {
                    self.keep(
                        &mut candidates,
                        ResourceKind::Job,
                        namespace,
                        &job.meta,
                        job_state(job),
                        job_reference_time(job),
                        now,
                    );
                }
            }
        }

        tracing::info!(
            namespaces = namespaces.len(),
            candidates = candidates.len(),
            "Scan complete"
        );
        Ok(candidates)
    }

    #[allow(clippy::too_many_arguments)]
    fn keep(
        &self,
        candidates: &mut Vec<Candidate>,
        kind: ResourceKind,
        namespace: &str,
        meta: &ResourceMeta,
        state: LifecycleState,
        reference: Option<SystemTime>,
        now: SystemTime,
    ) {
        match evaluate(self.config, kind, namespace, meta, state, reference, now) {
            Ok(candidate) => candidates.push(candidate),
            Err(reason) => {
                tracing::trace!(
                    kind = %kind,
                    namespace = %namespace,
                    name = %meta.name,
                    ?reason,
                    "Skipped"
                );
            }
        }
    }
}

fn list_error<E: std::fmt::Display>(kind: ResourceKind, namespace: &str, err: E) -> ReclaimError {
    ReclaimError::List {
        kind,
        namespace: namespace.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReclaimConfig;
    use crate::mock::{hours, job, minutes, pod, MockCluster};
    use std::time::Duration;

    fn one_hour() -> ReclaimConfig {
        ReclaimConfig::builder()
            .older_than(hours(1))
            .build()
            .unwrap()
    }

    fn ns(name: &str) -> Vec<String> {
        vec![name.to_string()]
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_terminal_pods_past_threshold() {
        let cluster = MockCluster::new()
            .with_pod(pod("test", "p-ok", "Succeeded", None, hours(2), &[]))
            .with_pod(pod("test", "p-fail", "Failed", None, hours(2), &[]))
            .with_pod(pod("test", "p-evict", "Failed", Some("Evicted"), hours(2), &[]))
            .with_pod(pod("test", "p-run", "Running", None, hours(2), &[]));
        let config = ReclaimConfig::builder()
            .older_than(hours(1))
            .kinds(["pod"])
            .build()
            .unwrap();

        let candidates = Scanner::new(&cluster, &config).scan(&ns("test")).await.unwrap();

        assert_eq!(names(&candidates), vec!["p-ok", "p-fail", "p-evict"]);
        assert_eq!(candidates[2].state, LifecycleState::Evicted);
        assert!(candidates.iter().all(|c| c.age >= hours(2)));
    }

    #[tokio::test]
    async fn test_protect_label_excludes() {
        let cluster = MockCluster::new()
            .with_pod(pod("test", "kept", "Succeeded", None, hours(2), &[("keep", "true")]))
            .with_pod(pod("test", "gone", "Succeeded", None, hours(2), &[]))
            .with_pod(pod("test", "other-value", "Succeeded", None, hours(2), &[("keep", "no")]));

        let candidates = Scanner::new(&cluster, &one_hour()).scan(&ns("test")).await.unwrap();
        assert_eq!(names(&candidates), vec!["gone", "other-value"]);
    }

    #[tokio::test]
    async fn test_protect_key_only_matches_any_value() {
        let cluster = MockCluster::new()
            .with_pod(pod("test", "kept", "Succeeded", None, hours(2), &[("keep", "no")]))
            .with_pod(pod("test", "gone", "Succeeded", None, hours(2), &[]));
        let config = ReclaimConfig::builder()
            .older_than(hours(1))
            .protect("keep")
            .build()
            .unwrap();

        let candidates = Scanner::new(&cluster, &config).scan(&ns("test")).await.unwrap();
        assert_eq!(names(&candidates), vec!["gone"]);
    }

    #[tokio::test]
    async fn test_jobs_by_completion() {
        let cluster = MockCluster::new()
            .with_job(job("test", "j-done", "Succeeded", hours(2)))
            .with_job(job("test", "j-fail", "Failed", hours(2)))
            .with_job(job("test", "j-active", "Active", hours(2)));
        let config = ReclaimConfig::builder()
            .older_than(hours(1))
            .kinds(["jobs"])
            .build()
            .unwrap();

        let candidates = Scanner::new(&cluster, &config).scan(&ns("test")).await.unwrap();

        assert_eq!(names(&candidates), vec!["j-done", "j-fail"]);
        assert!(candidates.iter().all(|c| c.kind == ResourceKind::Job));
        assert_eq!(candidates[0].state, LifecycleState::Succeeded);
        assert_eq!(candidates[1].state, LifecycleState::Failed);
    }

    #[tokio::test]
    async fn test_mixed_pods_with_running_evicted() {
        let cluster = MockCluster::new()
            .with_pod(pod("test", "done", "Succeeded", None, hours(2), &[]))
            .with_pod(pod("test", "crashed", "Failed", None, hours(3), &[]))
            .with_pod(pod("test", "evicted", "Running", Some("Evicted"), hours(4), &[]))
            .with_pod(pod("test", "fresh", "Succeeded", None, minutes(10), &[]));

        let candidates = Scanner::new(&cluster, &one_hour()).scan(&ns("test")).await.unwrap();

        assert_eq!(candidates.len(), 3);
        assert_eq!(names(&candidates), vec!["done", "crashed", "evicted"]);
        assert_eq!(candidates[2].state, LifecycleState::Evicted);
    }

    #[tokio::test]
    async fn test_protected_pod_of_two() {
        let cluster = MockCluster::new()
            .with_pod(pod("test", "labeled", "Succeeded", None, hours(2), &[("keep", "true")]))
            .with_pod(pod("test", "plain", "Succeeded", None, hours(2), &[]));
        let config = ReclaimConfig::builder()
            .older_than(hours(1))
            .protect("keep=true")
            .build()
            .unwrap();

        let candidates = Scanner::new(&cluster, &config).scan(&ns("test")).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(names(&candidates), vec!["plain"]);
    }

    #[tokio::test]
    async fn test_finished_jobs_past_a_day() {
        let cluster = MockCluster::new()
            .with_job(job("test", "nightly", "Succeeded", hours(25)))
            .with_job(job("test", "broken", "Failed", hours(26)))
            .with_job(job("test", "just-done", "Succeeded", minutes(10)));
        let config = ReclaimConfig::builder()
            .older_than(hours(24))
            .build()
            .unwrap();

        let candidates = Scanner::new(&cluster, &config).scan(&ns("test")).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(names(&candidates), vec!["nightly", "broken"]);
        assert!(candidates.iter().all(|c| c.kind == ResourceKind::Job));
    }

    #[tokio::test]
    async fn test_inclusion_flags_are_independent() {
        let cluster = MockCluster::new()
            .with_pod(pod("test", "ok", "Succeeded", None, hours(2), &[]))
            .with_pod(pod("test", "fail", "Failed", None, hours(2), &[]))
            .with_pod(pod("test", "evict", "Failed", Some("Evicted"), hours(2), &[]));
        let config = ReclaimConfig::builder()
            .older_than(hours(1))
            .include_failed(false)
            .build()
            .unwrap();

        let candidates = Scanner::new(&cluster, &config).scan(&ns("test")).await.unwrap();
        assert_eq!(names(&candidates), vec!["ok", "evict"]);
    }

    #[tokio::test]
    async fn test_young_resources_are_skipped() {
        let cluster = MockCluster::new()
            .with_pod(pod("test", "young", "Succeeded", None, minutes(10), &[]))
            .with_job(job("test", "young-job", "Succeeded", minutes(10)));

        let candidates = Scanner::new(&cluster, &one_hour()).scan(&ns("test")).await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_pods_before_jobs_across_namespaces() {
        let cluster = MockCluster::new()
            .with_job(job("a", "job-a", "Succeeded", hours(2)))
            .with_pod(pod("b", "pod-b", "Succeeded", None, hours(2), &[]))
            .with_pod(pod("a", "pod-a", "Succeeded", None, hours(2), &[]));
        let namespaces = vec!["a".to_string(), "b".to_string()];

        let candidates = Scanner::new(&cluster, &one_hour()).scan(&namespaces).await.unwrap();
        assert_eq!(names(&candidates), vec!["pod-a", "pod-b", "job-a"]);
    }

    #[tokio::test]
    async fn test_list_failure_aborts_scan() {
        let cluster = MockCluster::new()
            .with_pod(pod("a", "pod-a", "Succeeded", None, hours(2), &[]))
            .fail_list(ResourceKind::Pod, "b", "forbidden");
        let namespaces = vec!["a".to_string(), "b".to_string()];

        let err = Scanner::new(&cluster, &one_hour())
            .scan(&namespaces)
            .await
            .unwrap_err();
        match err {
            ReclaimError::List { kind, namespace, message } => {
                assert_eq!(kind, ResourceKind::Pod);
                assert_eq!(namespace, "b");
                assert_eq!(message, "forbidden");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_selectors_are_pushed_down() {
        let cluster = MockCluster::new();
        let config = ReclaimConfig::builder()
            .label_selector("app=batch")
            .field_selector("status.phase=Failed")
            .build()
            .unwrap();

        Scanner::new(&cluster, &config).scan(&ns("test")).await.unwrap();

        let seen = cluster.filters_seen();
        assert_eq!(seen.len(), 2);
        for filter in seen {
            assert_eq!(filter.label_selector.as_deref(), Some("app=batch"));
            assert_eq!(filter.field_selector.as_deref(), Some("status.phase=Failed"));
        }
    }

    #[test]
    fn test_evaluate_boundary_and_future() {
        let config = one_hour();
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(100_000);
        let meta = ResourceMeta::new("test", "p");

        let exact = evaluate(
            &config,
            ResourceKind::Pod,
            "test",
            &meta,
            LifecycleState::Succeeded,
            Some(now - hours(1)),
            now,
        )
        .unwrap();
        assert_eq!(exact.age, hours(1));

        let future = evaluate(
            &config,
            ResourceKind::Pod,
            "test",
            &meta,
            LifecycleState::Succeeded,
            Some(now + minutes(5)),
            now,
        );
        assert_eq!(future.unwrap_err(), SkipReason::TooYoung);

        let missing = evaluate(
            &config,
            ResourceKind::Pod,
            "test",
            &meta,
            LifecycleState::Succeeded,
            None,
            now,
        );
        assert_eq!(missing.unwrap_err(), SkipReason::NoReferenceTime);
    }

    #[test]
    fn test_evaluate_check_order() {
        let config = one_hour();
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(100_000);
        let meta = ResourceMeta::new("test", "p").with_label("keep", "true");

        let reason = evaluate(
            &config,
            ResourceKind::Pod,
            "test",
            &meta,
            LifecycleState::Phase("Running".to_string()),
            None,
            now,
        )
        .unwrap_err();
        assert_eq!(reason, SkipReason::Protected);
    }
}
