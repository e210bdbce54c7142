//! Ledger error types for validation and state errors.

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, AmountError, EntryId, LineId, OwnerId};
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// Entry is not balanced (debits != credits).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount is not a valid positive 2-digit amount.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Account is missing, soft-deleted, or owned by someone else.
    #[error("Unknown or foreign account: {0}")]
    UnknownOrForeignAccount(AccountId),

    /// Account name or suffix is malformed.
    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    /// Owner email or display name is malformed.
    #[error("Invalid owner: {0}")]
    InvalidOwner(String),

    /// Account kind cannot change once lines reference it.
    #[error("Cannot change kind of account {0} because it has lines")]
    KindChangeNotAllowed(AccountId),

    /// Lines of a soft-deleted entry cannot be removed.
    #[error("Entry {0} is deleted; its lines are frozen")]
    EntryFrozen(EntryId),

    // ========== Lookup Errors ==========
    /// Owner not found.
    #[error("Owner not found: {0}")]
    OwnerNotFound(OwnerId),

    /// Account not found or soft-deleted.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Entry not found or soft-deleted.
    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Line not found.
    #[error("Line not found: {0}")]
    LineNotFound(LineId),

    // ========== Uniqueness Errors ==========
    /// An active account with this name already exists for the owner.
    #[error("Account name already in use: {0}")]
    DuplicateAccountName(String),

    /// An owner with this email already exists.
    #[error("Owner email already in use: {0}")]
    DuplicateOwnerEmail(String),
}

impl LedgerError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientLines(_)
            | Self::Unbalanced { .. }
            | Self::InvalidAmount(_)
            | Self::UnknownOrForeignAccount(_)
            | Self::InvalidAccount(_)
            | Self::InvalidOwner(_)
            | Self::KindChangeNotAllowed(_)
            | Self::EntryFrozen(_) => ErrorKind::InvalidInput,

            Self::OwnerNotFound(_)
            | Self::AccountNotFound(_)
            | Self::EntryNotFound(_)
            | Self::LineNotFound(_) => ErrorKind::NotFound,

            Self::DuplicateAccountName(_) | Self::DuplicateOwnerEmail(_) => ErrorKind::Conflict,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::UnknownOrForeignAccount(_) => "UNKNOWN_OR_FOREIGN_ACCOUNT",
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::InvalidOwner(_) => "INVALID_OWNER",
            Self::KindChangeNotAllowed(_) => "KIND_CHANGE_NOT_ALLOWED",
            Self::EntryFrozen(_) => "ENTRY_FROZEN",
            Self::OwnerNotFound(_) => "OWNER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::DuplicateAccountName(_) => "DUPLICATE_ACCOUNT_NAME",
            Self::DuplicateOwnerEmail(_) => "DUPLICATE_OWNER_EMAIL",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Persistence => 500,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::of_kind(err.kind(), err.to_string())
    }
}
