//! Conversion from Kubernetes API objects to domain snapshots

use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use kube::api::ListParams;
use reclaim_domain::{JobCondition, JobSnapshot, ListFilter, PodSnapshot, ResourceMeta};
use std::time::SystemTime;

fn to_system_time(time: &Time) -> SystemTime {
    SystemTime::from(time.0)
}

/// Name, namespace, labels and creation time of any object
pub fn resource_meta(meta: &ObjectMeta) -> ResourceMeta {
    ResourceMeta {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        labels: meta.labels.clone().unwrap_or_default(),
        creation_timestamp: meta.creation_timestamp.as_ref().map(to_system_time),
    }
}

/// The fields of a Pod used for classification and aging
pub fn pod_snapshot(pod: &Pod) -> PodSnapshot {
    let status = pod.status.as_ref();
    PodSnapshot {
        meta: resource_meta(&pod.metadata),
        phase: status.and_then(|s| s.phase.clone()),
        reason: status.and_then(|s| s.reason.clone()),
        start_time: status
            .and_then(|s| s.start_time.as_ref())
            .map(to_system_time),
    }
}

/// The fields of a Job used for classification and aging
pub fn job_snapshot(job: &Job) -> JobSnapshot {
    let status = job.status.as_ref();
    JobSnapshot {
        meta: resource_meta(&job.metadata),
        conditions: status
            .and_then(|s| s.conditions.as_ref())
            .map(|conditions| {
                conditions
                    .iter()
                    .map(|c| JobCondition::new(c.type_.clone(), c.status.clone()))
                    .collect()
            })
            .unwrap_or_default(),
        completion_time: status
            .and_then(|s| s.completion_time.as_ref())
            .map(to_system_time),
    }
}

/// Name of a namespace object, if set
pub fn namespace_name(namespace: &Namespace) -> Option<String> {
    namespace.metadata.name.clone()
}

/// List parameters carrying the label and field selectors
pub fn list_params(filter: &ListFilter) -> ListParams {
    let mut params = ListParams::default();
    if let Some(labels) = &filter.label_selector {
        params = params.labels(labels);
    }
    if let Some(fields) = &filter.field_selector {
        params = params.fields(fields);
    }
    tracing::trace!(
        label_selector = ?filter.label_selector,
        field_selector = ?filter.field_selector,
        "Built ListParams"
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::batch::v1::{JobCondition as K8sJobCondition, JobStatus};
    use k8s_openapi::api::core::v1::PodStatus;
    use k8s_openapi::chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn time(secs: i64) -> Time {
        Time(Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn epoch(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn meta(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("test".to_string()),
            labels: Some(BTreeMap::from([("keep".to_string(), "true".to_string())])),
            creation_timestamp: Some(time(1_000)),
            ..Default::default()
        }
    }

    #[test]
    fn test_pod_snapshot() {
        let pod = Pod {
            metadata: meta("p1"),
            status: Some(PodStatus {
                phase: Some("Failed".to_string()),
                reason: Some("Evicted".to_string()),
                start_time: Some(time(1_030)),
                ..Default::default()
            }),
            ..Default::default()
        };

        let snapshot = pod_snapshot(&pod);
        assert_eq!(snapshot.meta.name, "p1");
        assert_eq!(snapshot.meta.namespace, "test");
        assert_eq!(snapshot.meta.labels.get("keep").map(String::as_str), Some("true"));
        assert_eq!(snapshot.meta.creation_timestamp, Some(epoch(1_000)));
        assert_eq!(snapshot.phase.as_deref(), Some("Failed"));
        assert_eq!(snapshot.reason.as_deref(), Some("Evicted"));
        assert_eq!(snapshot.start_time, Some(epoch(1_030)));
    }

    #[test]
    fn test_pod_without_status() {
        let pod = Pod {
            metadata: ObjectMeta::default(),
            ..Default::default()
        };
        let snapshot = pod_snapshot(&pod);
        assert_eq!(snapshot.meta.name, "");
        assert!(snapshot.meta.labels.is_empty());
        assert_eq!(snapshot.phase, None);
        assert_eq!(snapshot.start_time, None);
    }

    #[test]
    fn test_job_snapshot() {
        let job = Job {
            metadata: meta("j1"),
            status: Some(JobStatus {
                conditions: Some(vec![
                    K8sJobCondition {
                        type_: "SuccessCriteriaMet".to_string(),
                        status: "True".to_string(),
                        ..Default::default()
                    },
                    K8sJobCondition {
                        type_: "Complete".to_string(),
                        status: "True".to_string(),
                        ..Default::default()
                    },
                ]),
                completion_time: Some(time(2_000)),
                ..Default::default()
            }),
            ..Default::default()
        };

        let snapshot = job_snapshot(&job);
        assert_eq!(snapshot.conditions.len(), 2);
        assert!(snapshot.conditions[1].is_true("Complete"));
        assert_eq!(snapshot.completion_time, Some(epoch(2_000)));
    }

    #[test]
    fn test_namespace_name() {
        let ns = Namespace {
            metadata: ObjectMeta {
                name: Some("team-a".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(namespace_name(&ns).as_deref(), Some("team-a"));
        assert_eq!(namespace_name(&Namespace::default()), None);
    }

    #[test]
    fn test_list_params_selectors() {
        let params = list_params(&ListFilter::new(Some("app=batch"), Some("status.phase=Failed")));
        assert_eq!(params.label_selector.as_deref(), Some("app=batch"));
        assert_eq!(params.field_selector.as_deref(), Some("status.phase=Failed"));

        let empty = list_params(&ListFilter::default());
        assert_eq!(empty.label_selector, None);
        assert_eq!(empty.field_selector, None);
    }
}
