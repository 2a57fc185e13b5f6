// ============================================================================
// domain/error.rs - DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Malformed selection input: {reason}")]
    MalformedSelection { reason: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid service descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid base bundle: {0}")]
    InvalidBaseBundle(String),

    #[error("Duplicate artifact path: {path}")]
    DuplicateArtifactPath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Compatibility Errors (409-level equivalent)
    // ========================================================================
    #[error("unsupported backend platform '{platform}'")]
    UnsupportedPlatform { platform: String },

    #[error("unknown application type '{value}'")]
    UnknownApplicationType { value: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("No service named '{0}' in the catalog")]
    ServiceNotFound(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedSelection { reason } => vec![
                "The deployment or application payload could not be parsed".into(),
                format!("Details: {}", reason),
                "Both payloads must be JSON objects".into(),
            ],
            Self::UnsupportedPlatform { platform } => vec![
                format!("'{}' is not a supported backend platform", platform),
                "Supported platforms:".into(),
                "  • NODE   - Node.js / Express".into(),
                "  • PYTHON - Python".into(),
                "  • SWIFT  - Swift".into(),
                "  • JAVA   - Java".into(),
            ],
            Self::UnknownApplicationType { value } => vec![
                format!("'{}' is not a recognized application type", value),
                "Use \"WEB\" for web applications or \"MS\" for microservices".into(),
                "Omit the key entirely for untyped applications".into(),
            ],
            Self::ServiceNotFound(name) => vec![
                format!("No catalog entry for service '{}'", name),
                "Try: sprout list".into(),
            ],
            Self::InvalidDescriptor(msg) => vec![
                format!("Catalog entry is invalid: {}", msg),
                "Please report this issue or check your service pack".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedSelection { .. }
            | Self::InvalidProjectName { .. }
            | Self::InvalidDescriptor(_)
            | Self::InvalidBaseBundle(_)
            | Self::DuplicateArtifactPath { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::UnsupportedPlatform { .. } | Self::UnknownApplicationType { .. } => {
                ErrorCategory::Compatibility
            }
            Self::ServiceNotFound(_) => ErrorCategory::NotFound,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
