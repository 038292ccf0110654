use std::collections::HashMap;

use crate::domain::value_objects::ContainerId;

/// Original → duplicate container mapping for one locale pass.
///
/// Keyed by identity, never by name. Lives only for the pass that builds
/// it; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMap {
    locale: String,
    root: ContainerId,
    entries: HashMap<ContainerId, ContainerId>,
    created: Vec<ContainerId>,
}

impl DuplicateMap {
    pub fn new(locale: impl Into<String>, root: ContainerId) -> Self {
        Self {
            locale: locale.into(),
            root,
            entries: HashMap::new(),
            created: Vec::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The original root this map was built for.
    pub fn root(&self) -> ContainerId {
        self.root
    }

    /// Duplicate of the root, once it has been created.
    pub fn root_duplicate(&self) -> Option<ContainerId> {
        self.get(self.root)
    }

    pub fn get(&self, original: ContainerId) -> Option<ContainerId> {
        self.entries.get(&original).copied()
    }

    pub fn contains(&self, original: ContainerId) -> bool {
        self.entries.contains_key(&original)
    }

    pub fn insert(&mut self, original: ContainerId, duplicate: ContainerId) {
        if self.entries.insert(original, duplicate).is_none() {
            self.created.push(original);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(original, duplicate)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ContainerId, ContainerId)> + '_ {
        self.created.iter().map(|o| (*o, self.entries[o]))
    }
}
