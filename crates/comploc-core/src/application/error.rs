//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the driven ports,
//! not manifest or graph faults. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while talking to the host document or asset ports.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The host could not perform a document operation.
    #[error("Host failed to {operation}: {reason}")]
    HostError {
        operation: &'static str,
        reason: String,
    },

    /// A node identity the engine holds is unknown to the host.
    #[error("Unknown {node} in host document")]
    UnknownNode { node: String },

    /// Host state access failed (lock poisoned, etc.).
    #[error("Host document is locked")]
    HostLockError,

    /// Transaction boundaries were misused (nested begin, commit without begin).
    #[error("Transaction error: {reason}")]
    TransactionError { reason: String },

    /// A document file could not be read, parsed, or written.
    #[error("Document error at {path}: {reason}")]
    DocumentError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::HostError { operation, .. } => vec![
                format!("The host could not {}", operation),
                "No changes were kept; the run was rolled back".into(),
            ],
            Self::UnknownNode { node } => vec![
                format!("{} disappeared from the document during the run", node),
                "Make sure nothing else edits the document concurrently".into(),
            ],
            Self::HostLockError => vec![
                "The host document is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::DocumentError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that the file exists and is valid JSON".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HostError { .. } | Self::UnknownNode { .. } => ErrorCategory::Internal,
            Self::HostLockError | Self::TransactionError { .. } => ErrorCategory::Internal,
            Self::DocumentError { .. } => ErrorCategory::Validation,
        }
    }
}
