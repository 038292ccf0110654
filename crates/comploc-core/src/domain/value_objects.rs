//! Domain value objects: node identities, the node tag, leaf kinds, folders.
//!
//! # Design
//!
//! These are pure value types with equality-by-value. Identity of host
//! nodes is carried by [`ContainerId`] and [`LeafId`]; the engine never
//! relies on pointer equality from the host. Every reference slot carries a
//! [`NodeRef`], and all traversal code switches on that tag explicitly.

use crate::domain::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Identities ───────────────────────────────────────────────────────────────

/// Stable identity of a container inside the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u64);

/// Stable identity of a leaf inside the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeafId(pub u64);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container#{}", self.0)
    }
}

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaf#{}", self.0)
    }
}

// ── NodeRef ──────────────────────────────────────────────────────────────────

/// What a reference slot points at.
///
/// Closed set: a slot targets either another container or one of the two
/// leaf kinds. Hosts must report the tag; the engine never probes types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Container(ContainerId),
    TextLeaf(LeafId),
    AssetLeaf(LeafId),
}

impl NodeRef {
    /// The container this slot targets, if any.
    pub const fn container(self) -> Option<ContainerId> {
        match self {
            Self::Container(id) => Some(id),
            _ => None,
        }
    }

    /// The leaf and its kind, if this slot targets a leaf.
    pub const fn leaf(self) -> Option<(LeafId, LeafKind)> {
        match self {
            Self::TextLeaf(id) => Some((id, LeafKind::Text)),
            Self::AssetLeaf(id) => Some((id, LeafKind::Asset)),
            Self::Container(_) => None,
        }
    }

    pub const fn is_leaf(self) -> bool {
        !matches!(self, Self::Container(_))
    }
}

// ── LeafKind ─────────────────────────────────────────────────────────────────

/// The substitution kind of a manifest row, and the content kind of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafKind {
    #[default]
    Text,
    Asset,
}

impl LeafKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Asset => "asset",
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeafKind {
    type Err = ManifestError;

    /// Parses a manifest `kind` cell. An empty cell means text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "txt" => Ok(Self::Text),
            "asset" | "image" | "footage" | "file" => Ok(Self::Asset),
            other => Err(ManifestError::MalformedRow {
                line: 0,
                reason: format!("unknown kind '{other}' (expected text or asset)"),
            }),
        }
    }
}

// ── LeafContent ──────────────────────────────────────────────────────────────

/// The mutable value bound to a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeafContent {
    Text(String),
    Asset(std::path::PathBuf),
}

impl LeafContent {
    pub const fn kind(&self) -> LeafKind {
        match self {
            Self::Text(_) => LeafKind::Text,
            Self::Asset(_) => LeafKind::Asset,
        }
    }
}

// ── Folder ───────────────────────────────────────────────────────────────────

/// Grouping attribute of a container.
///
/// Root duplicates land in a visible, locale-scoped folder; every
/// intermediate duplicate lands in one hidden folder shared by all locales.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
}

impl Folder {
    pub fn visible(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
        }
    }

    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: true,
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hidden {
            write!(f, "{} (hidden)", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

// ── Reference ────────────────────────────────────────────────────────────────

/// One ordered slot inside a container, as reported by the host.
///
/// `name` is the slot's display name; for leaf slots it is the leaf name
/// that deep name resolution matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub slot: usize,
    pub name: String,
    pub target: NodeRef,
}

impl Reference {
    pub fn new(slot: usize, name: impl Into<String>, target: NodeRef) -> Self {
        Self {
            slot,
            name: name.into(),
            target,
        }
    }
}
