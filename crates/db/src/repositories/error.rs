//! Repository error type shared by every ledger repository.

use sea_orm::{DbErr, SqlErr};
use tally_core::ledger::LedgerError;
use tally_core::reports::ReportError;
use tally_shared::{AppError, ErrorKind};

use crate::entities::convert::RowDecodeError;

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A ledger rule rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A report request was rejected.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// A stored row could not be turned into a domain record.
    #[error(transparent)]
    Decode(#[from] RowDecodeError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(e) => e.kind(),
            Self::Report(e) => e.kind(),
            Self::Decode(_) | Self::Database(_) => ErrorKind::Persistence,
        }
    }

    /// Returns true if the store rejected a write on a unique index.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Database(err) => {
                matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
            }
            _ => false,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Ledger(e) => e.into(),
            RepositoryError::Report(e) => e.into(),
            other => Self::Persistence(other.to_string()),
        }
    }
}
