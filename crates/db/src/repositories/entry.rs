//! Entry repository: balanced journal entries and their lifecycle.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tally_core::ledger::{
    CreateEntryInput, EntryChanges, EntryRecord, EntryWithLines, LedgerError, LedgerService,
    LineRecord,
};
use tally_shared::types::{DateWindow, EntryId, LineId, OwnerId};
use tracing::{info, warn};

use super::RepositoryError;
use super::lookup::{entry_lines, find_accounts, find_entry, owner_exists};
use crate::entities::{journal_entries, journal_lines, not_deleted};

/// Entry repository.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an entry together with its full line set.
    ///
    /// Validation and both inserts run in one database transaction, so a
    /// rejected or failed entry leaves no rows behind.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The owner does not exist
    /// - Fewer than 2 lines are given
    /// - A line references a missing, deleted or foreign account, or has a
    ///   bad amount
    /// - Debits do not equal credits
    pub async fn create_balanced_entry(
        &self,
        input: CreateEntryInput,
    ) -> Result<EntryWithLines, RepositoryError> {
        let txn = self.db.begin().await?;

        let owner_found = owner_exists(&txn, input.owner_id).await?;
        let accounts = find_accounts(&txn, input.lines.iter().map(|l| l.account_id)).await?;

        let validated = LedgerService::validate_entry(
            &input,
            |_| owner_found,
            |id| accounts.get(&id).cloned(),
        )
        .inspect_err(|err| {
            warn!(owner_id = %input.owner_id, error = %err, "Journal entry rejected");
        })?;

        let now = Utc::now();
        let entry = journal_entries::ActiveModel {
            id: Set(EntryId::new().into_inner()),
            owner_id: Set(validated.owner_id.into_inner()),
            occurred_at: Set(validated.occurred_at),
            description: Set(validated.description.clone()),
            created_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await?;
        let entry = EntryRecord::from(entry);

        let lines: Vec<LineRecord> = validated
            .lines
            .iter()
            .map(|line| LineRecord {
                id: LineId::new(),
                entry_id: entry.id,
                account_id: line.account_id,
                amount: line.amount,
                side: line.side,
            })
            .collect();

        journal_lines::Entity::insert_many(lines.iter().map(line_active_model))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(
            entry_id = %entry.id,
            owner_id = %entry.owner_id,
            lines = lines.len(),
            total = %validated.totals.debit,
            "Journal entry created"
        );

        Ok(EntryWithLines { entry, lines })
    }

    /// Finds an active entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is missing or soft-deleted.
    pub async fn find_entry_with_lines(
        &self,
        entry_id: EntryId,
    ) -> Result<EntryWithLines, RepositoryError> {
        let entry = active_entry(&self.db, entry_id).await?;
        let lines = entry_lines(&self.db, entry_id).await?;
        Ok(EntryWithLines { entry, lines })
    }

    /// Lists active entries of an owner within `window`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the owner does not exist.
    pub async fn list_entries(
        &self,
        owner_id: OwnerId,
        window: DateWindow,
    ) -> Result<Vec<EntryRecord>, RepositoryError> {
        if !owner_exists(&self.db, owner_id).await? {
            return Err(LedgerError::OwnerNotFound(owner_id).into());
        }

        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::OwnerId.eq(owner_id.into_inner()))
            .filter(not_deleted(journal_entries::Column::DeletedAt));
        if let Some(start) = window.start() {
            query = query.filter(journal_entries::Column::OccurredAt.gte(start));
        }
        if let Some(end) = window.end() {
            query = query.filter(journal_entries::Column::OccurredAt.lte(end));
        }

        let entries = query
            .order_by_desc(journal_entries::Column::OccurredAt)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(entries.into_iter().map(EntryRecord::from).collect())
    }

    /// Updates the occurrence time or description of an active entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is missing or soft-deleted.
    pub async fn update_entry(
        &self,
        entry_id: EntryId,
        changes: EntryChanges,
    ) -> Result<EntryRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let entry = active_entry(&txn, entry_id).await?;
        if changes.occurred_at.is_none() && changes.description.is_none() {
            txn.commit().await?;
            return Ok(entry);
        }

        let mut active = journal_entries::ActiveModel {
            id: Set(entry_id.into_inner()),
            ..Default::default()
        };
        if let Some(occurred_at) = changes.occurred_at {
            active.occurred_at = Set(occurred_at);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        info!(entry_id = %entry_id, "Journal entry updated");
        Ok(updated.into())
    }

    /// Soft-deletes an active entry.
    ///
    /// Its lines are kept and stay retrievable by ID, but the entry drops out
    /// of every balance and statement.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is missing or already deleted.
    pub async fn soft_delete_entry(&self, entry_id: EntryId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        active_entry(&txn, entry_id).await?;
        journal_entries::ActiveModel {
            id: Set(entry_id.into_inner()),
            deleted_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        info!(entry_id = %entry_id, "Journal entry soft-deleted");
        Ok(())
    }
}

pub(crate) async fn active_entry<C: ConnectionTrait>(
    conn: &C,
    entry_id: EntryId,
) -> Result<EntryRecord, RepositoryError> {
    find_entry(conn, entry_id)
        .await?
        .filter(|e| e.lifecycle.is_active())
        .ok_or_else(|| LedgerError::EntryNotFound(entry_id).into())
}

pub(crate) fn line_active_model(line: &LineRecord) -> journal_lines::ActiveModel {
    journal_lines::ActiveModel {
        id: Set(line.id.into_inner()),
        entry_id: Set(line.entry_id.into_inner()),
        account_id: Set(line.account_id.into_inner()),
        amount_minor: Set(line.amount.to_minor_units()),
        side: Set(line.side.code().to_string()),
    }
}
