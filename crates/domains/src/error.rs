//! # AppError
//!
//! Centralized error handling for the Atelier ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all domain operations.
///
/// Public-facing boundaries must map every internal failure to one of
/// these kinds; nothing unstructured is allowed to reach the HTTP layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found, or not publicly visible. The two cases are
    /// deliberately indistinguishable so unpublished content never leaks.
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., comment too long, malformed email)
    #[error("validation error: {0}")]
    Validation(String),

    /// Security/Auth failure. Callers surface this generically and never
    /// distinguish "wrong password" from "unknown user".
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded. Carries only a retry hint, never the internal
    /// key or counter value.
    #[error("too many requests: retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// An external collaborator (document parser, object storage) failed.
    /// Detail is logged server-side; clients get a generic message.
    #[error("upstream service error: {0}")]
    Upstream(String),

    /// Infrastructure failure (e.g., DB down, I/O error)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// A `NotFound` with the conventional (entity, id) layout.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(entity.to_string(), id.to_string())
    }
}

/// A specialized Result type for Atelier logic.
pub type Result<T> = std::result::Result<T, AppError>;
