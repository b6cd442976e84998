//! kube-reclaim Domain Layer
//!
//! This crate contains the core value types and pure decision helpers for
//! reclaiming finished Pods and Jobs. It knows nothing about the Kubernetes
//! client library: infrastructure crates convert API objects into the
//! snapshots defined here.
//!
//! ## Key Concepts
//!
//! - **ResourceKind**: the closed set of reclaimable kinds (Pod, Job)
//! - **LifecycleState**: normalized state derived from raw status fields
//! - **Snapshots**: the subset of a Pod or Job the engine decides on
//! - **ProtectLabel**: a label that exempts a resource from deletion
//! - **Candidate / OutcomeRecord**: what the scanner finds and what the
//!   executor reports
//!
//! ## Architecture
//!
//! - Pure logic only, no I/O
//! - The cluster boundary is the [`traits::ClusterApi`] trait, implemented by
//!   `reclaim-kube` for a live API server and by mocks in tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod classify;
pub mod kind;
pub mod protect;
pub mod resource;
pub mod state;
pub mod traits;

// Re-exports for convenience
pub use candidate::{Candidate, OutcomeRecord};
pub use kind::{ParseKindError, ResourceKind};
pub use protect::ProtectLabel;
pub use resource::{JobCondition, JobSnapshot, ListFilter, PodSnapshot, ResourceMeta};
pub use state::LifecycleState;
pub use traits::ClusterApi;
