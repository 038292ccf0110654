//! JSON document files.
//!
//! ```json
//! { "containers": [ { "id": 1, "name": "Main", "folder": null,
//!     "references": [ { "name": "Sub", "container": 2 }, { "leaf": 10 } ] } ],
//!   "leaves": [ { "id": 10, "name": "Headline", "text": "Hello" },
//!               { "id": 11, "name": "Logo", "asset": "logo_en.png" } ] }
//! ```
//!
//! Leaf slots take their display name from the leaf itself.

use std::path::{Path, PathBuf};

use comploc_core::{
    application::ApplicationError,
    domain::{ContainerId, Folder, LeafContent, LeafId},
    error::CompLocResult,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::memory::MemoryDocument;

/// On-disk form of a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    #[serde(default)]
    pub containers: Vec<ContainerRecord>,
    #[serde(default)]
    pub leaves: Vec<LeafRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    pub id: ContainerId,
    pub name: String,
    #[serde(default)]
    pub folder: Option<Folder>,
    #[serde(default)]
    pub references: Vec<ReferenceRecord>,
}

/// One slot. Container slots carry their own name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceRecord {
    Container { name: String, container: ContainerId },
    Leaf { leaf: LeafId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRecord {
    pub id: LeafId,
    pub name: String,
    #[serde(flatten)]
    pub content: LeafContent,
}

/// Structural faults in a document file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentFileError {
    #[error("invalid JSON: {0}")]
    Syntax(String),

    #[error("{node} is defined twice")]
    DuplicateId { node: String },

    #[error("container '{container}' references missing {target}")]
    DanglingReference { container: String, target: String },
}

/// Parse a document from JSON text.
pub fn parse_document(raw: &str) -> Result<MemoryDocument, DocumentFileError> {
    let file: DocumentFile =
        serde_json::from_str(raw).map_err(|e| DocumentFileError::Syntax(e.to_string()))?;
    MemoryDocument::from_file(file)
}

/// Loads and saves a [`MemoryDocument`] at one path.
#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    path: PathBuf,
}

impl JsonDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the document file.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> CompLocResult<MemoryDocument> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| document_error(&self.path, format!("Failed to read file: {e}")))?;
        let document =
            parse_document(&raw).map_err(|e| document_error(&self.path, e.to_string()))?;

        debug!(
            containers = document.container_count()?,
            leaves = document.leaf_count()?,
            "document loaded"
        );
        Ok(document)
    }

    /// Write `document` to this store's path, pretty-printed.
    pub fn save(&self, document: &MemoryDocument) -> CompLocResult<()> {
        Self::save_to(document, &self.path)
    }

    /// Write `document` to `path`. Refuses while a transaction is open.
    #[instrument(skip(document), fields(path = %path.display()))]
    pub fn save_to(document: &MemoryDocument, path: &Path) -> CompLocResult<()> {
        if let Some(label) = document.transaction()? {
            return Err(ApplicationError::TransactionError {
                reason: format!("cannot save while '{label}' is open"),
            }
            .into());
        }

        let file = document.to_file()?;
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| document_error(path, format!("Failed to serialize: {e}")))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| document_error(path, format!("Failed to create directory: {e}")))?;
        }
        std::fs::write(path, json + "\n")
            .map_err(|e| document_error(path, format!("Failed to write file: {e}")))?;

        info!(containers = file.containers.len(), "document saved");
        Ok(())
    }
}

fn document_error(path: &Path, reason: String) -> comploc_core::error::CompLocError {
    ApplicationError::DocumentError {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}
