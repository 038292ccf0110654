//! Application services - orchestrate use cases.
//!
//! The building blocks (graph walking, replication, name resolution,
//! substitution) are free functions over the ports. [`LocalizeService`]
//! strings them together into one transactional run.

pub mod graph;
pub mod localize_service;
pub mod replication;
pub mod resolution;
pub mod substitution;

pub use graph::{container_children, discover, order};
pub use localize_service::{LocalizeService, RootPlan, RunPlan, TRANSACTION_LABEL};
pub use replication::{ReplicationOptions, replicate, verify_relinked};
pub use resolution::{Lookup, Resolved, ResolutionMiss, find_by_name};
pub use substitution::{Replicas, apply};
