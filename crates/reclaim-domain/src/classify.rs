//! State classification for Pods and Jobs
//!
//! Maps raw status fields to a [`LifecycleState`] and picks the timestamp a
//! resource's age is measured from. All functions are pure.

use crate::resource::{JobSnapshot, PodSnapshot};
use crate::state::LifecycleState;
use std::time::SystemTime;

/// Classify a pod
///
/// An `Evicted` status reason (any case) wins over the phase, because evicted
/// pods keep whatever phase they were in when the kubelet gave up on them.
/// A missing phase is reported as an empty phase.
///
/// # Examples
///
/// ```
/// use reclaim_domain::{LifecycleState, PodSnapshot};
/// use reclaim_domain::classify::pod_state;
///
/// let pod = PodSnapshot {
///     phase: Some("Running".into()),
///     reason: Some("evicted".into()),
///     ..Default::default()
/// };
/// assert_eq!(pod_state(&pod), LifecycleState::Evicted);
/// ```
pub fn pod_state(pod: &PodSnapshot) -> LifecycleState {
    if pod
        .reason
        .as_deref()
        .is_some_and(|reason| reason.eq_ignore_ascii_case("Evicted"))
    {
        return LifecycleState::Evicted;
    }
    LifecycleState::from_phase(pod.phase.as_deref().unwrap_or_default())
}

/// Classify a job from its conditions
///
/// Conditions are scanned in order and the first true `Complete` or `Failed`
/// condition decides. A job with neither is `Active`.
pub fn job_state(job: &JobSnapshot) -> LifecycleState {
    for condition in &job.conditions {
        if condition.is_true("Complete") {
            return LifecycleState::Succeeded;
        }
        if condition.is_true("Failed") {
            return LifecycleState::Failed;
        }
    }
    LifecycleState::Active
}

/// Timestamp a pod's age is measured from: start time, else creation time
pub fn pod_reference_time(pod: &PodSnapshot) -> Option<SystemTime> {
    pod.start_time.or(pod.meta.creation_timestamp)
}

/// Timestamp a job's age is measured from: completion time, else creation time
pub fn job_reference_time(job: &JobSnapshot) -> Option<SystemTime> {
    job.completion_time.or(job.meta.creation_timestamp)
}
