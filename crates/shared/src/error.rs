//! Application-wide error types.
//!
//! Every layer maps its own errors into [`AppError`] before handing them to
//! the transport collaborator. The domain taxonomy is `NotFound`,
//! `InvalidInput` and `Conflict`; storage failures are reported separately as
//! `Persistence`.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced owner, account, entry or line does not exist (or is soft-deleted).
    NotFound,
    /// The caller supplied input that violates a ledger rule.
    InvalidInput,
    /// The request collides with existing state (duplicate account name).
    Conflict,
    /// The durable store failed; not a caller problem.
    Persistence,
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected by validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Conflict (e.g., duplicate account name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage-layer failure.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl AppError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::Conflict(_) => 409,
            Self::Persistence(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Conflict(_) => "CONFLICT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Builds an error of the given kind.
    #[must_use]
    pub fn of_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::InvalidInput => Self::InvalidInput(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::Persistence => Self::Persistence(message),
        }
    }
}

impl From<crate::types::TimestampError> for AppError {
    fn from(err: crate::types::TimestampError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<crate::types::AmountError> for AppError {
    fn from(err: crate::types::AmountError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
