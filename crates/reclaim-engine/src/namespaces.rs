//! Namespace resolution

use crate::config::{NamespaceScope, DEFAULT_NAMESPACE};
use crate::error::{ReclaimError, Result};
use reclaim_domain::ClusterApi;
use std::collections::BTreeSet;

/// Expand a namespace scope into the concrete namespaces to scan
///
/// - `All`: every cluster namespace minus the exclusions, in API order
/// - `Explicit` with names: the names verbatim (exclusions never apply)
/// - `Explicit` without names: `["default"]`
///
/// Only the `All` case talks to the cluster; a listing failure aborts.
pub async fn resolve_namespaces<C: ClusterApi>(
    cluster: &C,
    scope: &NamespaceScope,
) -> Result<Vec<String>> {
    match scope {
        NamespaceScope::All { exclude } => {
            let names = cluster
                .list_namespaces()
                .await
                .map_err(|e| ReclaimError::Namespaces(e.to_string()))?;
            let total = names.len();
            let kept = filter_excluded(names, exclude);
            tracing::debug!(
                total,
                excluded = total - kept.len(),
                "Resolved all namespaces"
            );
            Ok(kept)
        }
        NamespaceScope::Explicit(names) if names.is_empty() => {
            Ok(vec![DEFAULT_NAMESPACE.to_string()])
        }
        NamespaceScope::Explicit(names) => Ok(names.clone()),
    }
}

/// Drop excluded names, preserving the order of the rest
pub fn filter_excluded(names: Vec<String>, exclude: &BTreeSet<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| !exclude.contains(name))
        .collect()
}
