//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Domain types and soft-delete lifecycle
//! - Entry builder validation (balanced entries)
//! - Standalone line mutation rules
//! - Account field rules
//! - Balance aggregation and sign conventions
//! - Error types for ledger operations

pub mod account;
pub mod balance;
pub mod error;
pub mod line;
pub mod service;
pub mod types;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod service_props;

pub use balance::{
    AccountAggregate, AccountTotals, BalanceAggregator, BalanceQuery, Posting, RunningBalance,
    SignConvention, Statement,
};
pub use error::LedgerError;
pub use line::{LineMutator, NewLine};
pub use service::LedgerService;
pub use types::{
    AccountChanges, AccountKind, AccountRecord, CreateEntryInput, EntryChanges, EntryRecord,
    EntryTotals, EntryWithLines, Lifecycle, LineChanges, LineRecord, NewLineInput, OwnerRecord,
    Side, ValidatedEntry, ValidatedLine,
};
