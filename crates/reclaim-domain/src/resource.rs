//! Resource module - the slice of a Pod or Job the engine decides on

use std::collections::BTreeMap;
use std::time::SystemTime;

/// Object metadata shared by every reclaimable resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMeta {
    /// Object name
    pub name: String,

    /// Namespace the object lives in
    pub namespace: String,

    /// Object labels
    pub labels: BTreeMap<String, String>,

    /// `metadata.creationTimestamp`
    pub creation_timestamp: Option<SystemTime>,
}

impl ResourceMeta {
    /// Create metadata with a name and namespace and no labels
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Add a label (builder style, mostly for tests and adapters)
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Set the creation timestamp
    pub fn created_at(mut self, at: SystemTime) -> Self {
        self.creation_timestamp = Some(at);
        self
    }
}

/// A Pod as seen by the classifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodSnapshot {
    /// Object metadata
    pub meta: ResourceMeta,

    /// `status.phase` (e.g. "Running", "Succeeded")
    pub phase: Option<String>,

    /// `status.reason` (e.g. "Evicted")
    pub reason: Option<String>,

    /// `status.startTime`
    pub start_time: Option<SystemTime>,
}

/// A single entry of `status.conditions` on a Job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCondition {
    /// Condition type (e.g. "Complete", "Failed", "Suspended")
    pub type_: String,

    /// Condition status ("True", "False", "Unknown")
    pub status: String,
}

impl JobCondition {
    /// Create a condition
    pub fn new(type_: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            status: status.into(),
        }
    }

    /// Whether this condition has the given type and status `True`
    pub fn is_true(&self, type_: &str) -> bool {
        self.type_ == type_ && self.status == "True"
    }
}

/// A Job as seen by the classifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSnapshot {
    /// Object metadata
    pub meta: ResourceMeta,

    /// `status.conditions`, in API order
    pub conditions: Vec<JobCondition>,

    /// `status.completionTime`
    pub completion_time: Option<SystemTime>,
}

/// Selectors pushed down to the API server when listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Label selector string (e.g. "app=nginx,tier!=db")
    pub label_selector: Option<String>,

    /// Field selector string (e.g. "status.phase=Succeeded")
    pub field_selector: Option<String>,
}

impl ListFilter {
    /// Build a filter, treating empty or blank selectors as absent
    pub fn new(label_selector: Option<&str>, field_selector: Option<&str>) -> Self {
        let clean = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Self {
            label_selector: clean(label_selector),
            field_selector: clean(field_selector),
        }
    }
}
