//! Application layer for comploc.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (LocalizeService and its steps)
//! - **Ports**: Interface definitions (traits) for the host document and assets
//! - **Errors**: Application-specific error types
//!
//! Services walk and mutate the host only through the ports; the manifest
//! and report rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{LocalizeService, ReplicationOptions, RootPlan, RunPlan};

// Re-export port traits (for adapter implementation)
pub use ports::{AssetLocator, DocumentHost};

pub use error::ApplicationError;
