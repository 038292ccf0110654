//! Document host adapters.

mod json;
mod memory;

pub use json::{
    ContainerRecord, DocumentFile, DocumentFileError, JsonDocumentStore, LeafRecord,
    ReferenceRecord, parse_document,
};
pub use memory::MemoryDocument;
