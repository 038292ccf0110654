//! Infrastructure adapters for comploc.
//!
//! This crate implements the ports defined in `comploc-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod assets;
pub mod document;

// Re-export commonly used adapters
pub use assets::{LocalAssets, MemoryAssets};
pub use document::{JsonDocumentStore, MemoryDocument, parse_document};
