//! Graph discovery and duplication ordering.
//!
//! The host's container graph is a DAG in the good case: a sub-container
//! may be shared by several parents. Discovery collapses sharing into one
//! entry and rejects cycles; ordering puts every child before its parents
//! so each duplicate can point at already-made duplicates of its children.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::{
    application::ports::DocumentHost,
    domain::{ContainerId, GraphError},
    error::CompLocResult,
};

/// Every container reachable from `root` through container references.
///
/// `root` itself is not part of the result. Each container appears once,
/// however many parents share it. A container that references one of its
/// own ancestors (or `root`) fails with [`GraphError::CyclicReference`].
#[instrument(skip(host), fields(root = %root))]
pub fn discover(host: &dyn DocumentHost, root: ContainerId) -> CompLocResult<Vec<ContainerId>> {
    let mut collected = Vec::new();
    let mut done: HashSet<ContainerId> = HashSet::new();
    // Containers on the current DFS path.
    let mut in_progress: HashSet<ContainerId> = HashSet::from([root]);
    let mut stack: Vec<Frame> = vec![Frame::open(host, root)?];

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.next_child() else {
            let finished = frame.id;
            stack.pop();
            in_progress.remove(&finished);
            if finished != root && done.insert(finished) {
                collected.push(finished);
            }
            continue;
        };

        if in_progress.contains(&child) {
            return Err(cyclic(host, child));
        }
        if done.contains(&child) {
            trace!(container = %child, "shared container already collected");
            continue;
        }

        in_progress.insert(child);
        stack.push(Frame::open(host, child)?);
    }

    debug!(count = collected.len(), "sub-containers discovered");
    Ok(collected)
}

/// Children-before-parents order over `containers`.
///
/// Only edges between members of the input set count. Repeatedly scans the
/// pending set for containers whose in-set children are all placed; a scan
/// without progress means a cycle and fails with
/// [`GraphError::CyclicReference`]. Ties keep input order.
#[instrument(skip_all, fields(count = containers.len()))]
pub fn order(
    host: &dyn DocumentHost,
    containers: &[ContainerId],
) -> CompLocResult<Vec<ContainerId>> {
    let mut seen = HashSet::new();
    let mut pending: Vec<ContainerId> = containers
        .iter()
        .copied()
        .filter(|c| seen.insert(*c))
        .collect();

    let mut children: HashMap<ContainerId, Vec<ContainerId>> = HashMap::new();
    for &container in &pending {
        let in_set = container_children(host, container)?
            .into_iter()
            .filter(|c| seen.contains(c))
            .collect();
        children.insert(container, in_set);
    }

    let mut placed: HashSet<ContainerId> = HashSet::new();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|container| {
            let ready = children
                .get(container)
                .is_none_or(|kids| kids.iter().all(|k| placed.contains(k)));
            if ready {
                placed.insert(*container);
                ordered.push(*container);
            }
            !ready
        });

        if pending.len() == before {
            return Err(cyclic(host, pending[0]));
        }
    }

    Ok(ordered)
}

/// Direct container children of `id`, in slot order.
pub fn container_children(
    host: &dyn DocumentHost,
    id: ContainerId,
) -> CompLocResult<Vec<ContainerId>> {
    Ok(host
        .references(id)?
        .into_iter()
        .filter_map(|r| r.target.container())
        .collect())
}

// ── Internal Helpers ─────────────────────────────────────────────────────────

/// One container on the explicit DFS stack.
struct Frame {
    id: ContainerId,
    children: std::vec::IntoIter<ContainerId>,
}

impl Frame {
    fn open(host: &dyn DocumentHost, id: ContainerId) -> CompLocResult<Self> {
        Ok(Self {
            id,
            children: container_children(host, id)?.into_iter(),
        })
    }

    fn next_child(&mut self) -> Option<ContainerId> {
        self.children.next()
    }
}

fn cyclic(host: &dyn DocumentHost, container: ContainerId) -> crate::error::CompLocError {
    let container = host
        .container_name(container)
        .unwrap_or_else(|_| container.to_string());
    GraphError::CyclicReference { container }.into()
}
