//! Unified error handling for comploc core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, GraphError, ManifestError};

/// Root error type for comploc core operations.
///
/// This enum wraps all possible errors that can occur when using comploc-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum CompLocError {
    /// Errors from the domain layer (manifest or graph faults).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (host or port failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl From<ManifestError> for CompLocError {
    fn from(err: ManifestError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<GraphError> for CompLocError {
    fn from(err: GraphError) -> Self {
        Self::Domain(err.into())
    }
}

impl CompLocError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in comploc".into(),
                "Please report this issue at: https://github.com/cosecruz/comploc/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type CompLocResult<T> = Result<T, CompLocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_errors_are_validation() {
        let err: CompLocError = ManifestError::NoLocaleColumns.into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn missing_root_is_not_found() {
        let err: CompLocError = GraphError::RootNotFound {
            name: "Main".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "no container named 'Main' in the document");
    }

    #[test]
    fn lock_errors_are_internal() {
        let err: CompLocError = ApplicationError::HostLockError.into();
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
