//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Referenced entity is absent
    NotFound(String),
    /// Caller is authenticated but lacks rights on the resource
    Forbidden(String),
    /// A write that should have affected a row affected none
    Invariant(String),
    /// Input rejected before reaching persistence
    Validation(String),
    /// Missing or wrong credentials
    Unauthorized(String),
    /// Cache or broker unavailable
    Transient(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        DomainError::Forbidden(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        DomainError::Invariant(msg.into())
    }

    /// The bare message, without the Display prefix
    pub fn message(&self) -> &str {
        match self {
            DomainError::NotFound(msg)
            | DomainError::Forbidden(msg)
            | DomainError::Invariant(msg)
            | DomainError::Validation(msg)
            | DomainError::Unauthorized(msg)
            | DomainError::Transient(msg)
            | DomainError::Database(msg)
            | DomainError::Internal(msg) => msg,
        }
    }

    /// True for errors the caller caused (4xx family).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound(_)
                | DomainError::Forbidden(_)
                | DomainError::Invariant(_)
                | DomainError::Validation(_)
                | DomainError::Unauthorized(_)
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "{}", msg),
            DomainError::Forbidden(msg) => write!(f, "{}", msg),
            DomainError::Invariant(msg) => write!(f, "{}", msg),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Unauthorized(msg) => write!(f, "{}", msg),
            DomainError::Transient(msg) => write!(f, "Service unavailable: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Internal(format!("serialization failed: {}", e))
    }
}
