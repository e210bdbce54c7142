//! Rules for standalone line mutations.
//!
//! Lines can be created, updated and removed outside of the entry builder.
//! In the permissive policy these paths never re-check the balanced-entry
//! invariant; in the strict policy the caller re-runs
//! [`LedgerService::ensure_balanced`](super::service::LedgerService::ensure_balanced)
//! over the resulting line set via [`LineMutator::check_balance`].

use rust_decimal::Decimal;
use tally_shared::LineMutationPolicy;
use tally_shared::types::{AccountId, Amount, EntryId, LineId};

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{AccountRecord, EntryRecord, LineChanges, LineRecord, Side};

/// Stateless validator for line create/update/delete.
pub struct LineMutator;

/// Validated fields of a new line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    /// Owning entry.
    pub entry_id: EntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Validated amount.
    pub amount: Amount,
    /// Debit or credit.
    pub side: Side,
}

impl LineMutator {
    /// Validates a standalone line creation.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the entry is missing or soft-deleted
    /// - `AccountNotFound` if the account is missing or soft-deleted
    /// - `UnknownOrForeignAccount` if the account belongs to another owner
    /// - `InvalidAmount` for a non-positive or over-precise amount
    pub fn validate_create(
        entry_id: EntryId,
        entry: Option<&EntryRecord>,
        account_id: AccountId,
        account: Option<&AccountRecord>,
        amount: Decimal,
        side: Side,
    ) -> Result<NewLine, LedgerError> {
        let entry = Self::active_entry(entry_id, entry)?;
        Self::account_for_entry(entry, account_id, account)?;
        let amount = Amount::new(amount)?;

        Ok(NewLine {
            entry_id,
            account_id,
            amount,
            side,
        })
    }

    /// Applies a partial update to an existing line.
    ///
    /// `entry` is the line's owning entry and `new_account` the record for
    /// `changes.account_id`, when one is requested.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if a new account is missing or soft-deleted
    /// - `UnknownOrForeignAccount` if the new account belongs to another owner
    /// - `InvalidAmount` for a bad new amount
    pub fn apply_update(
        line: &LineRecord,
        entry: &EntryRecord,
        changes: &LineChanges,
        new_account: Option<&AccountRecord>,
    ) -> Result<LineRecord, LedgerError> {
        let mut updated = line.clone();

        if let Some(account_id) = changes.account_id {
            Self::account_for_entry(entry, account_id, new_account)?;
            updated.account_id = account_id;
        }
        if let Some(amount) = changes.amount {
            updated.amount = Amount::new(amount)?;
        }
        if let Some(side) = changes.side {
            updated.side = side;
        }

        Ok(updated)
    }

    /// Validates a line removal.
    ///
    /// # Errors
    ///
    /// Returns `EntryFrozen` if the owning entry is soft-deleted.
    pub fn validate_delete(entry: &EntryRecord) -> Result<(), LedgerError> {
        if entry.lifecycle.is_active() {
            Ok(())
        } else {
            Err(LedgerError::EntryFrozen(entry.id))
        }
    }

    /// Applies the configured policy to the line set an entry would have
    /// after a mutation.
    ///
    /// # Errors
    ///
    /// Under [`LineMutationPolicy::Strict`], returns `Unbalanced` if the
    /// resulting lines do not balance.
    pub fn check_balance(
        policy: LineMutationPolicy,
        resulting_lines: &[LineRecord],
    ) -> Result<(), LedgerError> {
        if policy.enforces_balance() {
            LedgerService::ensure_balanced(resulting_lines)?;
        }
        Ok(())
    }

    /// Replaces or removes `line_id` in `lines`, or appends a new line.
    #[must_use]
    pub fn resulting_lines(
        mut lines: Vec<LineRecord>,
        line_id: LineId,
        replacement: Option<LineRecord>,
    ) -> Vec<LineRecord> {
        let position = lines.iter().position(|l| l.id == line_id);
        match (position, replacement) {
            (Some(i), Some(line)) => lines[i] = line,
            (Some(i), None) => {
                lines.remove(i);
            }
            (None, Some(line)) => lines.push(line),
            (None, None) => {}
        }
        lines
    }

    fn active_entry(
        entry_id: EntryId,
        entry: Option<&EntryRecord>,
    ) -> Result<&EntryRecord, LedgerError> {
        entry
            .filter(|e| e.lifecycle.is_active())
            .ok_or(LedgerError::EntryNotFound(entry_id))
    }

    fn account_for_entry(
        entry: &EntryRecord,
        account_id: AccountId,
        account: Option<&AccountRecord>,
    ) -> Result<(), LedgerError> {
        let account = account
            .filter(|a| a.lifecycle.is_active())
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        if account.owner_id != entry.owner_id {
            return Err(LedgerError::UnknownOrForeignAccount(account_id));
        }
        Ok(())
    }
}
