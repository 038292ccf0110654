//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `comploc-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `DocumentHost`: Container/leaf graph of the host application
//!   - `AssetLocator`: External resources bound to asset leaves
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{AssetLocator, DocumentHost};

#[cfg(test)]
pub use output::{MockAssetLocator, MockDocumentHost};
