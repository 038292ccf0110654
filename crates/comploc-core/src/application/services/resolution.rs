//! Deep name resolution.
//!
//! Search order for `find_by_name(root, name)`:
//!
//! 1. the direct slots of `root`, leaves only, in slot order;
//! 2. then each child container in slot order, recursively, with the same
//!    two phases.
//!
//! The first match wins. When the same leaf name exists in two sibling
//! sub-trees, the one whose container comes first in slot order is
//! returned and the other is ignored. A container already searched (shared
//! sub-trees) is not searched again.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    application::ports::DocumentHost,
    domain::{ContainerId, LeafId, LeafKind},
    error::CompLocResult,
};

/// A leaf found by name, with the container whose slot holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub leaf: LeafId,
    pub kind: LeafKind,
    pub owner: ContainerId,
}

/// No leaf of that name exists under the root. Not an error by itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no leaf named '{name}' under {root}")]
pub struct ResolutionMiss {
    pub root: ContainerId,
    pub name: String,
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Resolved),
    Missing(ResolutionMiss),
}

impl Lookup {
    pub fn found(self) -> Option<Resolved> {
        match self {
            Self::Found(resolved) => Some(resolved),
            Self::Missing(_) => None,
        }
    }
}

/// Find the first leaf called `name` under `root`.
///
/// Host failures are errors; a plain miss is [`Lookup::Missing`].
pub fn find_by_name(
    host: &dyn DocumentHost,
    root: ContainerId,
    name: &str,
) -> CompLocResult<Lookup> {
    let mut searched = HashSet::new();
    Ok(match search(host, root, name, &mut searched)? {
        Some(resolved) => Lookup::Found(resolved),
        None => Lookup::Missing(ResolutionMiss {
            root,
            name: name.to_string(),
        }),
    })
}

fn search(
    host: &dyn DocumentHost,
    container: ContainerId,
    name: &str,
    searched: &mut HashSet<ContainerId>,
) -> CompLocResult<Option<Resolved>> {
    if !searched.insert(container) {
        return Ok(None);
    }

    let references = host.references(container)?;

    // Shallow pass: leaves only.
    for reference in &references {
        if reference.name != name {
            continue;
        }
        if let Some((leaf, kind)) = reference.target.leaf() {
            return Ok(Some(Resolved {
                leaf,
                kind,
                owner: container,
            }));
        }
    }

    for child in references.iter().filter_map(|r| r.target.container()) {
        if let Some(found) = search(host, child, name, searched)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDocumentHost;
    use crate::domain::{NodeRef, Reference};

    /// 1: [Sub(2), Other(3), Background] ; 2: [Headline 20] ; 3: [Headline 30]
    fn two_headlines() -> MockDocumentHost {
        let mut mock = MockDocumentHost::new();
        mock.expect_references().returning(|id| {
            Ok(match id.0 {
                1 => vec![
                    Reference::new(0, "Sub", NodeRef::Container(ContainerId(2))),
                    Reference::new(1, "Other", NodeRef::Container(ContainerId(3))),
                    Reference::new(2, "Background", NodeRef::AssetLeaf(LeafId(10))),
                ],
                2 => vec![Reference::new(0, "Headline", NodeRef::TextLeaf(LeafId(20)))],
                3 => vec![Reference::new(0, "Headline", NodeRef::TextLeaf(LeafId(30)))],
                _ => vec![],
            })
        });
        mock
    }

    #[test]
    fn first_depth_first_match_wins() {
        let host = two_headlines();
        let found = find_by_name(&host, ContainerId(1), "Headline").unwrap().found().unwrap();
        assert_eq!(found.leaf, LeafId(20));
        assert_eq!(found.owner, ContainerId(2));
        assert_eq!(found.kind, LeafKind::Text);
    }

    #[test]
    fn direct_leaves_beat_nested_ones() {
        let host = two_headlines();
        let found = find_by_name(&host, ContainerId(1), "Background").unwrap().found().unwrap();
        assert_eq!(found.leaf, LeafId(10));
        assert_eq!(found.kind, LeafKind::Asset);
        assert_eq!(found.owner, ContainerId(1));
    }

    #[test]
    fn container_names_are_not_matched() {
        let host = two_headlines();
        let lookup = find_by_name(&host, ContainerId(1), "Sub").unwrap();
        assert_eq!(
            lookup,
            Lookup::Missing(ResolutionMiss {
                root: ContainerId(1),
                name: "Sub".into()
            })
        );
    }

    #[test]
    fn shallow_pass_runs_before_recursing_into_earlier_children() {
        // Root: [Sub(2), Title leaf 11] ; Sub: [Title leaf 21]
        let mut host = MockDocumentHost::new();
        host.expect_references().returning(|id| {
            Ok(match id.0 {
                1 => vec![
                    Reference::new(0, "Sub", NodeRef::Container(ContainerId(2))),
                    Reference::new(1, "Title", NodeRef::TextLeaf(LeafId(11))),
                ],
                2 => vec![Reference::new(0, "Title", NodeRef::TextLeaf(LeafId(21)))],
                _ => vec![],
            })
        });
        let found = find_by_name(&host, ContainerId(1), "Title").unwrap().found().unwrap();
        assert_eq!(found.leaf, LeafId(11));
    }
}
