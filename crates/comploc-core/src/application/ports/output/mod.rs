//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the engine needs from the host application.
//! The `comploc-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{ContainerId, Folder, LeafId, Reference};
use crate::error::CompLocResult;

/// Port for the host document model (compositions and layers, frames and
/// nodes, ...).
///
/// Implemented by:
/// - `comploc_adapters::document::MemoryDocument` (in-memory, also backs the JSON document file)
///
/// ## Design Notes
///
/// - Every method takes `&self`; hosts use interior mutability
/// - Identities are stable for the lifetime of the document
/// - `clone_container` is deep for leaves (new leaf identities with copied
///   content) and shallow for sub-containers (slots still target the
///   originals until the engine relinks them)
#[cfg_attr(test, mockall::automock)]
pub trait DocumentHost: Send + Sync {
    /// Look up a container by display name. First match wins.
    fn find_container(&self, name: &str) -> CompLocResult<Option<ContainerId>>;

    /// Display name of a container.
    fn container_name(&self, id: ContainerId) -> CompLocResult<String>;

    /// Ordered reference slots of a container.
    fn references(&self, id: ContainerId) -> CompLocResult<Vec<Reference>>;

    /// Clone a container, returning the new identity.
    fn clone_container(&self, id: ContainerId) -> CompLocResult<ContainerId>;

    /// Rename a container.
    fn set_container_name(&self, id: ContainerId, name: &str) -> CompLocResult<()>;

    /// Move a container into a folder.
    fn set_folder(&self, id: ContainerId, folder: &Folder) -> CompLocResult<()>;

    /// Point slot `slot` of `id` at another container.
    fn relink(&self, id: ContainerId, slot: usize, target: ContainerId) -> CompLocResult<()>;

    /// Text content of a text leaf.
    fn text(&self, leaf: LeafId) -> CompLocResult<String>;

    /// Replace the text content of a text leaf, keeping its styling.
    fn set_text(&self, leaf: LeafId, text: &str) -> CompLocResult<()>;

    /// Bound asset path of an asset leaf.
    fn asset_path(&self, leaf: LeafId) -> CompLocResult<PathBuf>;

    /// Rebind an asset leaf to another external resource.
    fn set_asset_path(&self, leaf: LeafId, path: &Path) -> CompLocResult<()>;

    /// Open an undoable group. Not nestable.
    fn begin_transaction(&self, label: &str) -> CompLocResult<()>;

    /// Close the open group, keeping every change.
    fn commit_transaction(&self) -> CompLocResult<()>;

    /// Close the open group, reverting every change made since `begin`.
    fn rollback_transaction(&self) -> CompLocResult<()>;
}

/// Port for external resources referenced by asset leaves.
///
/// Implemented by:
/// - `comploc_adapters::assets::LocalAssets` (files relative to a base directory)
/// - `comploc_adapters::assets::MemoryAssets` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait AssetLocator: Send + Sync {
    /// Turn a manifest value into a concrete resource path.
    fn resolve(&self, locator: &str) -> PathBuf;

    /// Whether the resource exists.
    fn exists(&self, path: &Path) -> bool;
}
