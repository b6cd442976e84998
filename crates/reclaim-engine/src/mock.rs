//! In-memory cluster used by the unit tests

use async_trait::async_trait;
use reclaim_domain::{
    ClusterApi, JobCondition, JobSnapshot, ListFilter, PodSnapshot, ResourceKind, ResourceMeta,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

#[derive(Default)]
pub struct MockCluster {
    namespaces: Vec<String>,
    pods: HashMap<String, Vec<PodSnapshot>>,
    jobs: HashMap<String, Vec<JobSnapshot>>,
    namespace_error: Option<String>,
    list_errors: HashMap<(ResourceKind, String), String>,
    delete_errors: HashMap<String, String>,
    delete_delay: Option<Duration>,
    deletes: Mutex<Vec<(ResourceKind, String, String)>>,
    filters: Mutex<Vec<ListFilter>>,
    namespace_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespaces(mut self, names: &[&str]) -> Self {
        self.namespaces = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_pod(mut self, pod: PodSnapshot) -> Self {
        self.pods.entry(pod.meta.namespace.clone()).or_default().push(pod);
        self
    }

    pub fn with_job(mut self, job: JobSnapshot) -> Self {
        self.jobs.entry(job.meta.namespace.clone()).or_default().push(job);
        self
    }

    pub fn fail_namespace_list(mut self, message: &str) -> Self {
        self.namespace_error = Some(message.to_string());
        self
    }

    pub fn fail_list(mut self, kind: ResourceKind, namespace: &str, message: &str) -> Self {
        self.list_errors
            .insert((kind, namespace.to_string()), message.to_string());
        self
    }

    pub fn fail_delete(mut self, name: &str, message: &str) -> Self {
        self.delete_errors.insert(name.to_string(), message.to_string());
        self
    }

    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = Some(delay);
        self
    }

    pub fn deleted(&self) -> Vec<(ResourceKind, String, String)> {
        self.deletes.lock().unwrap().clone()
    }

    pub fn filters_seen(&self) -> Vec<ListFilter> {
        self.filters.lock().unwrap().clone()
    }

    pub fn namespace_list_calls(&self) -> usize {
        self.namespace_calls.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_deletes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn check_list(&self, kind: ResourceKind, namespace: &str, filter: &ListFilter) -> Result<(), String> {
        self.filters.lock().unwrap().push(filter.clone());
        match self.list_errors.get(&(kind, namespace.to_string())) {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }

    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<(), String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = self.delete_errors.get(name) {
            return Err(message.clone());
        }
        self.deletes
            .lock()
            .unwrap()
            .push((kind, namespace.to_string(), name.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ClusterApi for MockCluster {
    type Error = String;

    async fn list_namespaces(&self) -> Result<Vec<String>, Self::Error> {
        self.namespace_calls.fetch_add(1, Ordering::SeqCst);
        match &self.namespace_error {
            Some(message) => Err(message.clone()),
            None => Ok(self.namespaces.clone()),
        }
    }

    async fn list_pods(&self, namespace: &str, filter: &ListFilter) -> Result<Vec<PodSnapshot>, Self::Error> {
        self.check_list(ResourceKind::Pod, namespace, filter)?;
        Ok(self.pods.get(namespace).cloned().unwrap_or_default())
    }

    async fn list_jobs(&self, namespace: &str, filter: &ListFilter) -> Result<Vec<JobSnapshot>, Self::Error> {
        self.check_list(ResourceKind::Job, namespace, filter)?;
        Ok(self.jobs.get(namespace).cloned().unwrap_or_default())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), Self::Error> {
        self.delete(ResourceKind::Pod, namespace, name).await
    }

    async fn delete_job(&self, namespace: &str, name: &str) -> Result<(), Self::Error> {
        self.delete(ResourceKind::Job, namespace, name).await
    }
}

/// A pod that started `age` ago
pub fn pod(
    namespace: &str,
    name: &str,
    phase: &str,
    reason: Option<&str>,
    age: Duration,
    labels: &[(&str, &str)],
) -> PodSnapshot {
    let started = SystemTime::now() - age;
    let mut meta = ResourceMeta::new(namespace, name).created_at(started);
    for (k, v) in labels {
        meta = meta.with_label(*k, *v);
    }
    PodSnapshot {
        meta,
        phase: Some(phase.to_string()),
        reason: reason.map(String::from),
        start_time: Some(started),
    }
}

/// A job in `state` ("Succeeded", "Failed" or anything else for active)
/// that finished `age` ago
pub fn job(namespace: &str, name: &str, state: &str, age: Duration) -> JobSnapshot {
    let reference = SystemTime::now() - age;
    let (conditions, completion_time) = match state {
        "Succeeded" => (vec![JobCondition::new("Complete", "True")], Some(reference)),
        "Failed" => (vec![JobCondition::new("Failed", "True")], Some(reference)),
        _ => (Vec::new(), None),
    };
    JobSnapshot {
        meta: ResourceMeta::new(namespace, name).created_at(reference),
        conditions,
        completion_time,
    }
}

pub fn hours(h: u64) -> Duration {
    Duration::from_secs(h * 3600)
}

pub fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}
