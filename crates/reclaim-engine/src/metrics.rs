//! Counters for reclaim runs

use reclaim_domain::candidate::CANCELLED_MESSAGE;
use reclaim_domain::{OutcomeRecord, ResourceKind};
use std::collections::BTreeMap;
use std::time::Duration;

/// Metrics collected while a run reports its outcomes
///
/// Tracks resources deleted, failed, cancelled and (in dry-run mode) the
/// ones that would have been deleted, per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReclaimMetrics {
    /// Resources deleted per kind
    pub deleted: BTreeMap<ResourceKind, usize>,

    /// Delete failures per kind
    pub failed: BTreeMap<ResourceKind, usize>,

    /// Dry-run candidates per kind
    pub would_delete: BTreeMap<ResourceKind, usize>,

    /// Candidates skipped because the run was cancelled
    pub cancelled: usize,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl ReclaimMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metrics from a finished set of outcomes
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a OutcomeRecord>) -> Self {
        let mut metrics = Self::new();
        for record in records {
            metrics.record(record);
        }
        metrics
    }

    /// Count one outcome
    pub fn record(&mut self, record: &OutcomeRecord) {
        let bucket = match (&record.error, record.deleted, record.dry_run) {
            (Some(e), _, _) if e == CANCELLED_MESSAGE => {
                self.cancelled += 1;
                return;
            }
            (Some(_), _, _) => &mut self.failed,
            (None, true, _) => &mut self.deleted,
            (None, false, true) => &mut self.would_delete,
            (None, false, false) => return,
        };
        *bucket.entry(record.kind).or_insert(0) += 1;
    }

    /// Total resources deleted
    pub fn total_deleted(&self) -> usize {
        self.deleted.values().sum()
    }

    /// Total delete failures, excluding cancellations
    pub fn total_failed(&self) -> usize {
        self.failed.values().sum()
    }

    /// Total dry-run candidates
    pub fn total_would_delete(&self) -> usize {
        self.would_delete.values().sum()
    }

    /// Whether any outcome carried an error, cancellations included
    pub fn has_errors(&self) -> bool {
        self.total_failed() > 0 || self.cancelled > 0
    }

    /// One-line summary for the end of a run
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.would_delete.is_empty() {
            parts.push(format!("{} would be deleted", self.total_would_delete()));
        }
        if !self.deleted.is_empty() || self.would_delete.is_empty() {
            parts.push(format!("{} deleted", self.total_deleted()));
        }
        if self.total_failed() > 0 {
            parts.push(format!("{} failed", self.total_failed()));
        }
        if self.cancelled > 0 {
            parts.push(format!("{} cancelled", self.cancelled));
        }

        let by_kind: Vec<String> = ResourceKind::ALL
            .iter()
            .filter_map(|kind| {
                let n = self.deleted.get(kind).copied().unwrap_or(0)
                    + self.would_delete.get(kind).copied().unwrap_or(0);
                (n > 0).then(|| format!("{kind}s: {n}"))
            })
            .collect();

        let mut line = parts.join(", ");
        if !by_kind.is_empty() {
            line.push_str(&format!(" ({})", by_kind.join(", ")));
        }
        line.push_str(&format!(" in {:.1}s", self.elapsed.as_secs_f64()));
        line
    }
}
