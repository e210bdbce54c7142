//! Conversions between stored rows and core ledger records.

use std::fmt::Display;

use tally_core::ledger::{
    AccountKind, AccountRecord, EntryRecord, Lifecycle, LineRecord, OwnerRecord, Posting, Side,
};
use tally_shared::types::{AccountId, Amount, EntryId, LineId, OwnerId};
use thiserror::Error;
use uuid::Uuid;

use super::{journal_entries, journal_lines, ledger_accounts, owners};

/// A stored row holds a value the domain rejects.
#[derive(Debug, Error)]
#[error("Invalid {table} row {id}: {reason}")]
pub struct RowDecodeError {
    /// Table the row came from.
    pub table: &'static str,
    /// Primary key of the row.
    pub id: Uuid,
    /// What failed to decode.
    pub reason: String,
}

impl RowDecodeError {
    fn new(table: &'static str, id: Uuid, reason: impl Display) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

impl From<owners::Model> for OwnerRecord {
    fn from(model: owners::Model) -> Self {
        Self {
            id: OwnerId::from_uuid(model.id),
            email: model.email,
            display_name: model.display_name,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

impl TryFrom<ledger_accounts::Model> for AccountRecord {
    type Error = RowDecodeError;

    fn try_from(model: ledger_accounts::Model) -> Result<Self, Self::Error> {
        let kind: AccountKind = model
            .kind
            .parse()
            .map_err(|e| RowDecodeError::new("ledger_accounts", model.id, e))?;

        Ok(Self {
            id: AccountId::from_uuid(model.id),
            owner_id: OwnerId::from_uuid(model.owner_id),
            name: model.name,
            kind,
            suffix: model.suffix,
            created_at: model.created_at,
            updated_at: model.updated_at,
            lifecycle: Lifecycle::from_deleted_at(model.deleted_at),
        })
    }
}

impl From<journal_entries::Model> for EntryRecord {
    fn from(model: journal_entries::Model) -> Self {
        Self {
            id: EntryId::from_uuid(model.id),
            owner_id: OwnerId::from_uuid(model.owner_id),
            occurred_at: model.occurred_at,
            description: model.description,
            created_at: model.created_at,
            lifecycle: Lifecycle::from_deleted_at(model.deleted_at),
        }
    }
}

impl TryFrom<journal_lines::Model> for LineRecord {
    type Error = RowDecodeError;

    fn try_from(model: journal_lines::Model) -> Result<Self, Self::Error> {
        let side: Side = model
            .side
            .parse()
            .map_err(|e| RowDecodeError::new("journal_lines", model.id, e))?;
        let amount = Amount::from_minor_units(model.amount_minor)
            .map_err(|e| RowDecodeError::new("journal_lines", model.id, e))?;

        Ok(Self {
            id: LineId::from_uuid(model.id),
            entry_id: EntryId::from_uuid(model.entry_id),
            account_id: AccountId::from_uuid(model.account_id),
            amount,
            side,
        })
    }
}

/// Joins a line with its entry into a posting.
///
/// # Errors
///
/// Returns an error if the line row does not decode.
pub fn posting(
    line: journal_lines::Model,
    entry: &journal_entries::Model,
) -> Result<Posting, RowDecodeError> {
    let line = LineRecord::try_from(line)?;
    Ok(Posting {
        line_id: line.id,
        entry_id: line.entry_id,
        account_id: line.account_id,
        amount: line.amount,
        side: line.side,
        occurred_at: entry.occurred_at,
        entry_created_at: entry.created_at,
        description: entry.description.clone(),
        entry_lifecycle: Lifecycle::from_deleted_at(entry.deleted_at),
    })
}
