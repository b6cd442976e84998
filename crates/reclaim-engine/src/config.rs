//! Configuration for reclaim runs
//!
//! A [`ReclaimConfig`] is built once per invocation, validated by
//! [`ReclaimConfigBuilder::build`], and only ever read afterwards.
//! [`ExecutionOptions`] carries the knobs that affect deletion but not
//! candidate selection.

use crate::error::ConfigError;
use reclaim_domain::{LifecycleState, ProtectLabel, ResourceKind};
use std::collections::BTreeSet;
use std::time::Duration;

/// Default age threshold: one day
pub const DEFAULT_OLDER_THAN: Duration = Duration::from_secs(24 * 3600);

/// Default number of concurrent delete workers
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Namespace used when no namespace is given
pub const DEFAULT_NAMESPACE: &str = "default";

/// Label that exempts a resource unless configured otherwise
pub const DEFAULT_PROTECT_LABEL: &str = "keep=true";

/// Namespaces skipped when scanning all namespaces without an explicit
/// exclusion list
pub const DEFAULT_EXCLUDED_NAMESPACES: [&str; 2] = ["kube-system", "kube-public"];

/// Which namespaces to scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    /// Exactly these namespaces; an empty list means `["default"]`
    Explicit(Vec<String>),

    /// Every namespace in the cluster except the excluded ones
    All {
        /// Namespace names to skip
        exclude: BTreeSet<String>,
    },
}

impl Default for NamespaceScope {
    fn default() -> Self {
        NamespaceScope::Explicit(Vec::new())
    }
}

/// Which terminal states may be reclaimed
///
/// The flags are independent of each other. States other than the three
/// terminal ones are never reclaimable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatePolicy {
    /// Reclaim `Succeeded` pods and completed jobs
    pub include_completed: bool,

    /// Reclaim `Failed` pods and jobs
    pub include_failed: bool,

    /// Reclaim evicted pods
    pub include_evicted: bool,
}

impl Default for StatePolicy {
    fn default() -> Self {
        Self {
            include_completed: true,
            include_failed: true,
            include_evicted: true,
        }
    }
}

impl StatePolicy {
    /// Whether a resource in this state may become a candidate
    pub fn includes(&self, state: &LifecycleState) -> bool {
        match state {
            LifecycleState::Succeeded => self.include_completed,
            LifecycleState::Failed => self.include_failed,
            LifecycleState::Evicted => self.include_evicted,
            LifecycleState::Active | LifecycleState::Phase(_) => false,
        }
    }
}

/// Candidate selection settings for one reclaim run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReclaimConfig {
    /// Minimum age before a resource can be reclaimed
    pub older_than: Duration,

    /// Kinds to scan
    pub kinds: BTreeSet<ResourceKind>,

    /// Namespaces to scan
    pub namespaces: NamespaceScope,

    /// Label selector pushed down to list calls
    pub label_selector: Option<String>,

    /// Field selector pushed down to list calls
    pub field_selector: Option<String>,

    /// Reclaimable states
    pub states: StatePolicy,

    /// Label exempting resources from deletion, if any
    pub protect: Option<ProtectLabel>,
}

impl Default for ReclaimConfig {
    /// Pods and jobs older than 24h in `default`, every terminal state,
    /// protected by `keep=true`
    fn default() -> Self {
        Self {
            older_than: DEFAULT_OLDER_THAN,
            kinds: ResourceKind::ALL.into_iter().collect(),
            namespaces: NamespaceScope::default(),
            label_selector: None,
            field_selector: None,
            states: StatePolicy::default(),
            protect: ProtectLabel::parse(DEFAULT_PROTECT_LABEL),
        }
    }
}

impl ReclaimConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> ReclaimConfigBuilder {
        ReclaimConfigBuilder::default()
    }

    /// Whether this kind should be scanned
    pub fn includes_kind(&self, kind: ResourceKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Parse an age threshold such as `30m`, `24h` or `7d`
///
/// # Examples
///
/// ```
/// use reclaim_engine::config::parse_age;
/// use std::time::Duration;
///
/// assert_eq!(parse_age("90m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_age("7d").unwrap(), Duration::from_secs(7 * 86400));
/// assert!(parse_age("soon").is_err());
/// ```
pub fn parse_age(value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Validating builder for [`ReclaimConfig`]
///
/// Raw user input (duration strings, kind names, `key[=value]` protect
/// specs) is accepted as-is and checked in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ReclaimConfigBuilder {
    older_than: Option<Duration>,
    older_than_raw: Option<String>,
    kinds: Option<Vec<String>>,
    namespaces: NamespaceScope,
    label_selector: Option<String>,
    field_selector: Option<String>,
    states: StatePolicy,
    protect_raw: Option<String>,
}

impl Default for ReclaimConfigBuilder {
    fn default() -> Self {
        Self {
            older_than: None,
            older_than_raw: None,
            kinds: None,
            namespaces: NamespaceScope::default(),
            label_selector: None,
            field_selector: None,
            states: StatePolicy::default(),
            protect_raw: Some(DEFAULT_PROTECT_LABEL.to_string()),
        }
    }
}

impl ReclaimConfigBuilder {
    /// Set the age threshold
    pub fn older_than(mut self, older_than: Duration) -> Self {
        self.older_than = Some(older_than);
        self.older_than_raw = None;
        self
    }

    /// Set the age threshold from text, parsed at build time
    pub fn older_than_str(mut self, value: impl Into<String>) -> Self {
        self.older_than_raw = Some(value.into());
        self.older_than = None;
        self
    }

    /// Set the kinds to scan from names such as `pod`, `Pods`, `job`
    pub fn kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.kinds = Some(kinds.into_iter().map(|k| k.as_ref().to_string()).collect());
        self
    }

    /// Scan exactly these namespaces
    pub fn namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = NamespaceScope::Explicit(namespaces.into_iter().map(Into::into).collect());
        self
    }

    /// Scan every namespace except the excluded ones
    pub fn all_namespaces<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.namespaces = NamespaceScope::All {
            exclude: exclude.into_iter().map(Into::into).collect(),
        };
        self
    }

    /// Set the label selector
    pub fn label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

    /// Set the field selector
    pub fn field_selector(mut self, selector: impl Into<String>) -> Self {
        self.field_selector = Some(selector.into());
        self
    }

    /// Whether completed resources may be reclaimed
    pub fn include_completed(mut self, include: bool) -> Self {
        self.states.include_completed = include;
        self
    }

    /// Whether failed resources may be reclaimed
    pub fn include_failed(mut self, include: bool) -> Self {
        self.states.include_failed = include;
        self
    }

    /// Whether evicted pods may be reclaimed
    pub fn include_evicted(mut self, include: bool) -> Self {
        self.states.include_evicted = include;
        self
    }

    /// Set the protect label as `key[=value]`; an empty label disables protection
    pub fn protect(mut self, label: impl Into<String>) -> Self {
        self.protect_raw = Some(label.into());
        self
    }

    /// Disable the protect label
    pub fn no_protect(mut self) -> Self {
        self.protect_raw = None;
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<ReclaimConfig, ConfigError> {
        let older_than = match (self.older_than, self.older_than_raw) {
            (Some(duration), _) => duration,
            (None, Some(raw)) => parse_age(&raw)?,
            (None, None) => DEFAULT_OLDER_THAN,
        };

        let kinds = match self.kinds {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<ResourceKind>())
                .collect::<Result<BTreeSet<_>, _>>()?,
            None => ResourceKind::ALL.into_iter().collect(),
        };
        if kinds.is_empty() {
            return Err(ConfigError::NoKinds);
        }

        let protect = match self.protect_raw {
            Some(label) if !label.trim().is_empty() => Some(
                ProtectLabel::parse(&label).ok_or(ConfigError::InvalidProtectLabel(label))?,
            ),
            _ => None,
        };

        let clean = |s: Option<String>| s.filter(|s| !s.trim().is_empty());

        Ok(ReclaimConfig {
            older_than,
            kinds,
            namespaces: self.namespaces,
            label_selector: clean(self.label_selector),
            field_selector: clean(self.field_selector),
            states: self.states,
            protect,
        })
    }
}

/// Settings for the deletion phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Report what would be deleted without deleting
    pub dry_run: bool,

    /// Number of delete workers; values below 1 are treated as 1
    pub concurrency: usize,
}

impl Default for ExecutionOptions {
    /// Dry-run with ten workers
    fn default() -> Self {
        Self {
            dry_run: true,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ExecutionOptions {
    /// Real deletions with the given concurrency
    pub fn delete(concurrency: usize) -> Self {
        Self {
            dry_run: false,
            concurrency,
        }
    }

    /// Number of workers actually spawned
    pub fn workers(&self) -> usize {
        self.concurrency.max(1)
    }
}
