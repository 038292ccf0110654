// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for comploc.
//!
//! This module contains pure logic with no host access: the manifest model,
//! the run report, the per-locale duplicate map, and the value types that
//! name host nodes. Everything that touches the host document goes through
//! the ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No host I/O**: Manifest text comes in as `&str`
//! - **Identity, not pointers**: Host nodes are named by `ContainerId` / `LeafId`
//! - **Closed node tag**: `NodeRef` replaces runtime type probing
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    duplicate_map::DuplicateMap,
    manifest::{
        ColumnRole, DEFAULT_DELIMITER, Manifest, ManifestOptions, ManifestRow, detect_locales,
    },
    report::{MAX_REPORTED_ERRORS, Report, ReportBuilder},
};

pub use error::{DomainError, ErrorCategory, GraphError, ManifestError, SubstitutionError};

pub use value_objects::{
    ContainerId, Folder, LeafContent, LeafId, LeafKind, NodeRef, Reference,
};
