//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The service catalog could not be read.
    #[error("Catalog access failed: {reason}")]
    CatalogAccess { reason: String },

    /// Fragment merging failed for one artifact.
    #[error("Merge failed for artifact '{artifact}': {reason}")]
    MergeFailed { artifact: String, reason: String },

    /// Filesystem operation failed while writing an artifact.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Catalog store access failed (lock poisoned, etc.).
    #[error("Service catalog store error")]
    StoreLockError,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::CatalogAccess { reason } => vec![
                format!("Catalog could not be read: {}", reason),
                "Try: sprout list to inspect the catalog".into(),
                "If you use a service pack, check its directory layout".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to write: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
                "Partial output may remain; discard the output directory".into(),
            ],
            Self::StoreLockError => vec![
                "The service catalog is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::MergeFailed { artifact, .. } => vec![
                format!("Could not assemble artifact '{}'", artifact),
                "Run 'sprout validate' to check catalog integrity".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CatalogAccess { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::MergeFailed { .. } => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
