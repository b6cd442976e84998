//! Kind module - the resource kinds the engine can reclaim

use std::fmt;
use std::str::FromStr;

/// A reclaimable resource kind
///
/// User input such as `"Pods"` or `" job "` is normalized once, at the
/// configuration boundary; everything past that point matches on the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// core/v1 Pod
    Pod,

    /// batch/v1 Job
    Job,
}

impl ResourceKind {
    /// Every supported kind, in scan order
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Pod, ResourceKind::Job];

    /// Get the kind name as it appears in outcome records
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "pod",
            ResourceKind::Job => "job",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind string names nothing we can reclaim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(pub String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported resource kind '{}' (expected pod or job)", self.0)
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for ResourceKind {
    type Err = ParseKindError;

    /// Parse a kind case-insensitively, accepting singular and plural forms
    ///
    /// # Examples
    ///
    /// ```
    /// use reclaim_domain::ResourceKind;
    ///
    /// assert_eq!("Pods".parse::<ResourceKind>(), Ok(ResourceKind::Pod));
    /// assert_eq!(" job ".parse::<ResourceKind>(), Ok(ResourceKind::Job));
    /// assert!("deployment".parse::<ResourceKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.strip_suffix('s').unwrap_or(&normalized) {
            "pod" => Ok(ResourceKind::Pod),
            "job" => Ok(ResourceKind::Job),
            _ => Err(ParseKindError(s.trim().to_string())),
        }
    }
}
