//! Error types for Readstack
//!
//! One shared taxonomy is used across every layer:
//! - **NotFound**: a referenced entity id does not resolve
//! - **Validation / InvalidArgument**: malformed or out-of-range input
//! - **Conflict**: a unique key (e.g. ISBN) already exists
//! - **Database**: the storage layer failed
//! - **ExternalService**: the metadata lookup collaborator failed or timed out
//! - **Internal**: anything unanticipated, reported with a safe message
//!
//! Each error carries a stable machine-readable code for the API boundary.

use std::fmt;
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for Readstack
#[derive(Error, Debug)]
pub enum AppError {
    /// Referenced entity does not exist
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    /// One or more fields failed validation
    #[error("Validation failed: {}", format_violations(.violations))]
    Validation { violations: Vec<Violation> },

    /// A single argument is malformed or out of range
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// A unique constraint was violated
    #[error("Conflict on {resource}: {detail}")]
    Conflict { resource: String, detail: String },

    /// Database operation failed
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// External metadata provider failed or timed out
    #[error("External service '{provider}' unavailable: {reason}")]
    ExternalService { provider: String, reason: String },

    /// Unexpected internal failure
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    /// Returns the stable machine-readable code for this error.
    ///
    /// NotFound codes are entity-specific (`BOOK_NOT_FOUND`, `AUTHOR_NOT_FOUND`,
    /// ...) so API clients can branch without parsing messages.
    pub fn code(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => {
                format!("{}_NOT_FOUND", entity.to_ascii_uppercase())
            }
            Self::Validation { .. } => "VALIDATION_ERROR".to_string(),
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT".to_string(),
            Self::Conflict { resource, .. } => {
                format!("DUPLICATE_{}", resource.to_ascii_uppercase())
            }
            Self::Database { .. } => "DATABASE_ERROR".to_string(),
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_UNAVAILABLE".to_string(),
            Self::Internal { .. } => "INTERNAL_ERROR".to_string(),
        }
    }

    /// Returns a message safe to show to API callers.
    ///
    /// Database and internal errors are reported generically; their details
    /// stay in the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. }
            | Self::Validation { .. }
            | Self::InvalidArgument { .. }
            | Self::Conflict { .. }
            | Self::ExternalService { .. } => self.to_string(),
            Self::Database { .. } | Self::Internal { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// Returns the per-field messages for a validation error, empty otherwise
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { violations } => violations,
            _ => &[],
        }
    }

    /// Returns true if this error means a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Helper to create a not-found error for an entity
    pub fn not_found(entity: impl Into<String>, identifier: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            identifier: identifier.to_string(),
        }
    }

    /// Helper to create a validation error from field violations
    pub fn validation(violations: Vec<Violation>) -> Self {
        Self::Validation { violations }
    }

    /// Helper to create an invalid-argument error
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create a conflict error for a unique resource
    pub fn conflict(resource: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Conflict {
            resource: resource.into(),
            detail: detail.into(),
        }
    }

    /// Helper to create a database error from any error type
    pub fn database<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper to create an external-service error
    pub fn external_service(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalService {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
