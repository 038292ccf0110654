// ============================================================================
// domain/error.rs - MANIFEST, GRAPH AND SUBSTITUTION ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::LeafKind;

/// Root domain error type.
///
/// Every variant here is fatal for a run. Manifest errors and
/// [`GraphError::CyclicReference`] / [`GraphError::RootNotFound`] surface
/// while planning, before the host document is touched.
/// [`GraphError::DanglingOriginal`] and [`GraphError::TopologyMismatch`] are
/// raised inside the host transaction, which is rolled back. Non-fatal
/// outcomes ([`SubstitutionError`], resolution misses) are aggregated into the
/// run report instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failures while reading the tabular manifest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest has no locale columns")]
    NoLocaleColumns,

    #[error("manifest is missing the required '{column}' column")]
    MissingColumn { column: &'static str },

    #[error("malformed manifest row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("locale '{locale}' is not a column of the manifest")]
    UnknownLocale { locale: String },
}

/// Failures in the container reference graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("container '{container}' references one of its own ancestors")]
    CyclicReference { container: String },

    #[error("no container named '{name}' in the document")]
    RootNotFound { name: String },

    #[error("duplicate '{duplicate}' still references original container '{original}'")]
    DanglingOriginal { duplicate: String, original: String },

    #[error("duplicate '{duplicate}' does not mirror its original: {reason}")]
    TopologyMismatch { duplicate: String, reason: String },
}

/// A substitution that could not be applied. Never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    #[error("asset not found: {}", path.display())]
    AssetNotFound { path: PathBuf },

    #[error("leaf '{leaf}' holds {found} content, row expects {expected}")]
    WrongLeafKind {
        leaf: String,
        expected: LeafKind,
        found: LeafKind,
    },

    #[error("host rejected the change: {reason}")]
    HostMutationFailed { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Manifest(ManifestError::NoLocaleColumns) => vec![
                "Add one column per locale next to rootName, leafName and kind".into(),
                "Example header: rootName,leafName,kind,en,fr,de".into(),
            ],
            Self::Manifest(ManifestError::MissingColumn { column }) => vec![
                format!("Add a '{}' column to the manifest header", column),
                "Accepted names: rootName|comp_name, leafName|layer_name, kind|type".into(),
            ],
            Self::Manifest(ManifestError::MalformedRow { line, .. }) => vec![
                format!("Fix line {} of the manifest", line),
                "Quote fields containing the delimiter or line breaks".into(),
            ],
            Self::Manifest(ManifestError::UnknownLocale { locale }) => vec![
                format!("'{}' is not a manifest column", locale),
                "Try: comploc locales <MANIFEST>".into(),
            ],
            Self::Graph(GraphError::CyclicReference { container }) => vec![
                format!("Break the reference loop through '{}'", container),
                "A container may not (indirectly) contain itself".into(),
            ],
            Self::Graph(GraphError::RootNotFound { name }) => vec![
                format!("Check the spelling of '{}' in the rootName column", name),
                "Try: comploc tree --document <FILE> --root <NAME>".into(),
            ],
            Self::Graph(_) => vec![
                "The host produced an inconsistent duplicate".into(),
                "No changes were kept; please report this issue".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Manifest(ManifestError::UnknownLocale { .. }) => ErrorCategory::NotFound,
            Self::Manifest(_) => ErrorCategory::Validation,
            Self::Graph(GraphError::RootNotFound { .. }) => ErrorCategory::NotFound,
            Self::Graph(GraphError::CyclicReference { .. }) => ErrorCategory::Validation,
            Self::Graph(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
