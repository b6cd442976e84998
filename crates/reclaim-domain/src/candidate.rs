//! Candidates and their outcome records

use crate::kind::ResourceKind;
use crate::state::LifecycleState;
use std::time::{Duration, SystemTime};

/// Error text recorded for candidates drained after cancellation
pub const CANCELLED_MESSAGE: &str = "cancelled before deletion";

/// A resource that passed protection, state and age filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Resource kind
    pub kind: ResourceKind,

    /// Namespace
    pub namespace: String,

    /// Object name
    pub name: String,

    /// Classified state at scan time
    pub state: LifecycleState,

    /// Age at scan time, measured from the reference timestamp
    pub age: Duration,
}

impl Candidate {
    /// `kind/namespace/name`, for logs
    pub fn display_name(&self) -> String {
        format!("{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Terminal result of processing one candidate
///
/// Exactly one is produced per candidate. `deleted` is true only when the run
/// was not a dry-run and the delete call succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    /// Resource kind
    pub kind: ResourceKind,

    /// Namespace
    pub namespace: String,

    /// Object name
    pub name: String,

    /// State the candidate was selected in
    pub state: LifecycleState,

    /// Age the candidate was selected at
    pub age: Duration,

    /// Whether the resource was deleted
    pub deleted: bool,

    /// Whether this was a dry-run
    pub dry_run: bool,

    /// Delete error message, if the delete failed or never ran
    pub error: Option<String>,

    /// When the record was produced
    pub timestamp: SystemTime,
}

impl OutcomeRecord {
    fn from_candidate(candidate: Candidate, dry_run: bool) -> Self {
        Self {
            kind: candidate.kind,
            namespace: candidate.namespace,
            name: candidate.name,
            state: candidate.state,
            age: candidate.age,
            deleted: false,
            dry_run,
            error: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Record for a candidate that would have been deleted
    pub fn dry_run(candidate: Candidate) -> Self {
        Self::from_candidate(candidate, true)
    }

    /// Record for a successful delete
    pub fn deleted(candidate: Candidate) -> Self {
        Self {
            deleted: true,
            ..Self::from_candidate(candidate, false)
        }
    }

    /// Record for a delete that returned an error
    pub fn failed(candidate: Candidate, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::from_candidate(candidate, false)
        }
    }

    /// Record for a candidate that was never attempted because the run was cancelled
    pub fn cancelled(candidate: Candidate, dry_run: bool) -> Self {
        Self {
            error: Some(CANCELLED_MESSAGE.to_string()),
            ..Self::from_candidate(candidate, dry_run)
        }
    }

    /// Whether the record carries an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
