//! Per-locale duplication of a container tree with relinking.
//!
//! Containers are cloned children-first. Right after a clone, every slot of
//! the duplicate that still targets an in-subtree original is pointed at
//! that original's duplicate, which already exists because of the order.
//! The root duplicate is the only one placed in a visible, locale-scoped
//! folder; intermediate levels go to one hidden shared folder.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    application::ports::DocumentHost,
    domain::{ContainerId, DuplicateMap, Folder, GraphError, NodeRef},
    error::CompLocResult,
};

/// Naming and placement of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationOptions {
    /// Inserted between the original name and the locale.
    pub separator: String,
    /// Hidden folder holding every non-root duplicate.
    pub shared_folder: String,
    /// Visible folder for root duplicates; `{locale}` and `{root}` expand.
    pub locale_folder: String,
}

impl Default for ReplicationOptions {
    fn default() -> Self {
        Self {
            separator: "_".into(),
            shared_folder: "_comploc_shared".into(),
            locale_folder: "{locale}".into(),
        }
    }
}

impl ReplicationOptions {
    /// `Main` + `en` → `Main_en`.
    pub fn duplicate_name(&self, original: &str, locale: &str) -> String {
        format!("{original}{}{locale}", self.separator)
    }

    pub fn locale_folder_for(&self, root: &str, locale: &str) -> Folder {
        Folder::visible(
            self.locale_folder
                .replace("{locale}", locale)
                .replace("{root}", root),
        )
    }

    pub fn shared_folder(&self) -> Folder {
        Folder::hidden(self.shared_folder.clone())
    }
}

/// Duplicate `root` and its ordered `subtree` for `locale`.
///
/// `subtree` must be children-first (see [`super::graph::order`]). The root
/// is processed last whether or not the caller included it. Existing
/// containers are never renamed: when `Main_en` is taken the duplicate
/// becomes `Main_en_2`, then `Main_en_3`, and so on.
#[instrument(skip(host, subtree, options), fields(root = %root, size = subtree.len()))]
pub fn replicate(
    host: &dyn DocumentHost,
    root: ContainerId,
    subtree: &[ContainerId],
    locale: &str,
    options: &ReplicationOptions,
) -> CompLocResult<DuplicateMap> {
    let members: HashSet<ContainerId> = subtree.iter().copied().chain([root]).collect();
    let root_name = host.container_name(root)?;

    let mut map = DuplicateMap::new(locale, root);
    let sequence = subtree
        .iter()
        .copied()
        .filter(|c| *c != root)
        .chain([root]);

    for original in sequence {
        if map.contains(original) {
            continue;
        }

        let name = host.container_name(original)?;
        let duplicate = host.clone_container(original)?;
        let base = options.duplicate_name(&name, locale);
        let target_name = unique_name(host, &base, &options.separator)?;
        host.set_container_name(duplicate, &target_name)?;

        let folder = if original == root {
            options.locale_folder_for(&root_name, locale)
        } else {
            options.shared_folder()
        };
        host.set_folder(duplicate, &folder)?;

        relink(host, duplicate, &target_name, &map, &members)?;
        map.insert(original, duplicate);

        debug!(
            original = %name,
            duplicate = %target_name,
            folder = %folder,
            "container duplicated"
        );
    }

    Ok(map)
}

/// Check that every duplicate in `map` mirrors its original and holds no
/// slot pointing back into the original subtree.
///
/// Mirroring means: same slot count, same tag per slot, fresh leaf
/// identities, and container slots targeting either the child's duplicate
/// (in-subtree) or the very same outside container.
pub fn verify_relinked(
    host: &dyn DocumentHost,
    map: &DuplicateMap,
    subtree: &[ContainerId],
) -> CompLocResult<()> {
    let members: HashSet<ContainerId> = subtree.iter().copied().chain([map.root()]).collect();

    for (original, duplicate) in map.iter() {
        let original_refs = host.references(original)?;
        let duplicate_refs = host.references(duplicate)?;
        let duplicate_name = || {
            host.container_name(duplicate).unwrap_or_else(|_| duplicate.to_string())
        };

        if original_refs.len() != duplicate_refs.len() {
            return Err(GraphError::TopologyMismatch {
                duplicate: duplicate_name(),
                reason: format!(
                    "{} slots, original has {}",
                    duplicate_refs.len(),
                    original_refs.len()
                ),
            }
            .into());
        }

        for (before, after) in original_refs.iter().zip(&duplicate_refs) {
            match (before.target, after.target) {
                (NodeRef::Container(_), NodeRef::Container(target))
                    if members.contains(&target) =>
                {
                    return Err(GraphError::DanglingOriginal {
                        duplicate: duplicate_name(),
                        original: host
                            .container_name(target)
                            .unwrap_or_else(|_| target.to_string()),
                    }
                    .into());
                }
                (NodeRef::Container(child), NodeRef::Container(target)) => {
                    let expected = map.get(child).unwrap_or(child);
                    if expected != target {
                        let what = "relinked to the wrong container";
                        return Err(mismatch(duplicate_name(), before.slot, what));
                    }
                }
                (NodeRef::TextLeaf(a), NodeRef::TextLeaf(b))
                | (NodeRef::AssetLeaf(a), NodeRef::AssetLeaf(b)) => {
                    if a == b {
                        let what = "leaf shared with the original";
                        return Err(mismatch(duplicate_name(), before.slot, what));
                    }
                }
                _ => {
                    return Err(mismatch(duplicate_name(), before.slot, "slot kind changed"));
                }
            }
        }
    }

    Ok(())
}

// ── Internal Helpers ─────────────────────────────────────────────────────────

/// Redirect in-subtree container slots of `duplicate` to their duplicates.
fn relink(
    host: &dyn DocumentHost,
    duplicate: ContainerId,
    duplicate_name: &str,
    map: &DuplicateMap,
    members: &HashSet<ContainerId>,
) -> CompLocResult<()> {
    for reference in host.references(duplicate)? {
        let NodeRef::Container(child) = reference.target else {
            continue;
        };
        if !members.contains(&child) {
            continue;
        }
        match map.get(child) {
            Some(child_duplicate) => host.relink(duplicate, reference.slot, child_duplicate)?,
            // Child not duplicated yet: the subtree was not children-first.
            None => {
                return Err(GraphError::DanglingOriginal {
                    duplicate: duplicate_name.to_string(),
                    original: host.container_name(child)?,
                }
                .into());
            }
        }
    }
    Ok(())
}

/// First free name among `base`, `base_2`, `base_3`, ...
fn unique_name(host: &dyn DocumentHost, base: &str, separator: &str) -> CompLocResult<String> {
    if host.find_container(base)?.is_none() {
        return Ok(base.to_string());
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}{separator}{n}");
        if host.find_container(&candidate)?.is_none() {
            return Ok(candidate);
        }
        n += 1;
    }
}

fn mismatch(duplicate: String, slot: usize, what: &str) -> crate::error::CompLocError {
    GraphError::TopologyMismatch {
        duplicate,
        reason: format!("slot {slot}: {what}"),
    }
    .into()
}
