//! Report error types.

use chrono::{DateTime, Utc};
use tally_shared::types::{AccountId, OwnerId, TimestampError};
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Account not found or soft-deleted.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Owner not found.
    #[error("Owner not found: {0}")]
    OwnerNotFound(OwnerId),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start instant.
        start: DateTime<Utc>,
        /// End instant.
        end: DateTime<Utc>,
    },

    /// A date parameter failed strict parsing.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl ReportError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) | Self::OwnerNotFound(_) => ErrorKind::NotFound,
            Self::InvalidDateRange { .. } | Self::InvalidDate(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<TimestampError> for ReportError {
    fn from(err: TimestampError) -> Self {
        match err {
            TimestampError::InvertedRange { start, end } => Self::InvalidDateRange { start, end },
            TimestampError::Invalid(_) => Self::InvalidDate(err.to_string()),
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::of_kind(err.kind(), err.to_string())
    }
}
