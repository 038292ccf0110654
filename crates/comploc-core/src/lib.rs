//! Comploc Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for comploc, the
//! composition localization engine, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           comploc-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (LocalizeService: plan, replicate,     │
//! │   verify, substitute)                   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: DocumentHost, AssetLocator)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    comploc-adapters (Infrastructure)    │
//! │  (MemoryDocument, JsonDocumentStore,    │
//! │   LocalAssets)                          │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │   (Manifest, Report, DuplicateMap)      │
//! │         No Host Access                  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comploc_core::{
//!     application::{LocalizeService, ReplicationOptions},
//!     domain::Manifest,
//! };
//!
//! // 1. Parse the manifest
//! let manifest = Manifest::parse("rootName,leafName,kind,en\nMain,Title,text,Hi\n")?;
//!
//! // 2. Run it against a host (with injected adapters)
//! let service = LocalizeService::new(host, assets, ReplicationOptions::default());
//! let report = service.run(&manifest)?;
//! println!("{} applied, {} failed", report.applied(), report.failed());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        LocalizeService, ReplicationOptions, RunPlan,
        ports::{AssetLocator, DocumentHost},
    };
    pub use crate::domain::{
        ContainerId, DuplicateMap, Folder, LeafContent, LeafId, LeafKind, Manifest,
        ManifestOptions, ManifestRow, NodeRef, Reference, Report,
    };
    pub use crate::error::{CompLocError, CompLocResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
