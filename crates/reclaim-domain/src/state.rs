//! State module - normalized lifecycle states

use std::fmt;

/// Lifecycle state of a Pod or Job after classification
///
/// Only `Succeeded`, `Failed` and `Evicted` can ever be reclaimed. Everything
/// else (`Active` jobs, `Running` or `Pending` pods) is kept regardless of the
/// inclusion flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Pod phase `Succeeded`, or a Job with a true `Complete` condition
    Succeeded,

    /// Pod phase `Failed`, or a Job with a true `Failed` condition
    Failed,

    /// Pod whose status reason is `Evicted`
    Evicted,

    /// Job with neither a true `Complete` nor a true `Failed` condition
    Active,

    /// Any other pod phase, carried verbatim (e.g. `Running`, `Pending`)
    Phase(String),
}

impl LifecycleState {
    /// Get the state name as reported in outcome records
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::Succeeded => "Succeeded",
            LifecycleState::Failed => "Failed",
            LifecycleState::Evicted => "Evicted",
            LifecycleState::Active => "Active",
            LifecycleState::Phase(phase) => phase,
        }
    }

    /// Normalize a raw pod phase
    ///
    /// The terminal phases map onto their variants so that a pod and a job in
    /// the same condition compare equal.
    pub fn from_phase(phase: &str) -> Self {
        match phase {
            "Succeeded" => LifecycleState::Succeeded,
            "Failed" => LifecycleState::Failed,
            other => LifecycleState::Phase(other.to_string()),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
