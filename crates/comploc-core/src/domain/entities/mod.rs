pub mod duplicate_map;
pub mod manifest;
pub mod report;

pub use crate::domain::DomainError;
pub use duplicate_map::DuplicateMap;
pub use manifest::{Manifest, ManifestRow};
pub use report::{Report, ReportBuilder};
