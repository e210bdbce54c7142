//! Line repository: standalone line mutations and line listings.
//!
//! Mutations follow the configured [`LineMutationPolicy`]. Under the default
//! permissive policy they never re-check the owning entry's balance.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tally_core::ledger::{LedgerError, LineChanges, LineMutator, LineRecord, Side};
use tally_shared::LineMutationPolicy;
use tally_shared::types::{AccountId, EntryId, LineId};
use tracing::{debug, info};

use super::RepositoryError;
use super::entry::{active_entry, line_active_model};
use super::lookup::{entry_lines, find_account, find_entry, find_line};
use crate::entities::{journal_entries, journal_lines, not_deleted};

/// Input for creating a single line.
#[derive(Debug, Clone)]
pub struct CreateLineInput {
    /// Owning entry.
    pub entry_id: EntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Positive amount with at most 2 fraction digits.
    pub amount: Decimal,
    /// Debit or credit.
    pub side: Side,
}

/// Line repository.
#[derive(Debug, Clone)]
pub struct LineRepository {
    db: DatabaseConnection,
    policy: LineMutationPolicy,
}

impl LineRepository {
    /// Creates a line repository with the permissive policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            policy: LineMutationPolicy::default(),
        }
    }

    /// Sets the mutation policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: LineMutationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Adds a line to an active entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry or account is missing or soft-deleted
    /// - The account belongs to another owner
    /// - The amount is not positive or has more than 2 fraction digits
    /// - The policy is strict and the entry would no longer balance
    pub async fn create_line(
        &self,
        input: CreateLineInput,
    ) -> Result<LineRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let entry = find_entry(&txn, input.entry_id).await?;
        let account = find_account(&txn, input.account_id).await?;
        let new_line = LineMutator::validate_create(
            input.entry_id,
            entry.as_ref(),
            input.account_id,
            account.as_ref(),
            input.amount,
            input.side,
        )?;

        let line = LineRecord {
            id: LineId::new(),
            entry_id: new_line.entry_id,
            account_id: new_line.account_id,
            amount: new_line.amount,
            side: new_line.side,
        };
        self.check_balance(&txn, line.entry_id, line.id, Some(line.clone()))
            .await?;

        line_active_model(&line).insert(&txn).await?;

        txn.commit().await?;

        info!(line_id = %line.id, entry_id = %line.entry_id, "Journal line created");
        Ok(line)
    }

    /// Applies a partial update to a line. Unset fields are unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The line does not exist
    /// - A new account is missing, soft-deleted or foreign
    /// - A new amount is invalid
    /// - The policy is strict and the entry would no longer balance
    pub async fn update_line(
        &self,
        line_id: LineId,
        changes: LineChanges,
    ) -> Result<LineRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let line = existing_line(&txn, line_id).await?;
        if changes.is_empty() {
            txn.commit().await?;
            return Ok(line);
        }

        let entry = find_entry(&txn, line.entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(line.entry_id))?;
        let new_account = match changes.account_id {
            Some(account_id) => find_account(&txn, account_id).await?,
            None => None,
        };
        let updated = LineMutator::apply_update(&line, &entry, &changes, new_account.as_ref())?;
        self.check_balance(&txn, line.entry_id, line_id, Some(updated.clone()))
            .await?;

        journal_lines::ActiveModel {
            id: Set(line_id.into_inner()),
            account_id: Set(updated.account_id.into_inner()),
            amount_minor: Set(updated.amount.to_minor_units()),
            side: Set(updated.side.code().to_string()),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        info!(line_id = %line_id, entry_id = %line.entry_id, "Journal line updated");
        Ok(updated)
    }

    /// Hard-deletes a line of an active entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The line does not exist
    /// - The owning entry is soft-deleted
    /// - The policy is strict and the entry would no longer balance
    pub async fn delete_line(&self, line_id: LineId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let line = existing_line(&txn, line_id).await?;
        let entry = find_entry(&txn, line.entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(line.entry_id))?;
        LineMutator::validate_delete(&entry)?;
        self.check_balance(&txn, line.entry_id, line_id, None).await?;

        journal_lines::Entity::delete_by_id(line_id.into_inner())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(line_id = %line_id, entry_id = %line.entry_id, "Journal line deleted");
        Ok(())
    }

    /// Finds a line by ID, even if its entry is soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns `LineNotFound` if no line has this ID.
    pub async fn find_line(&self, line_id: LineId) -> Result<LineRecord, RepositoryError> {
        existing_line(&self.db, line_id).await
    }

    /// Lists the lines of an active entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry is missing or soft-deleted.
    pub async fn list_entry_lines(
        &self,
        entry_id: EntryId,
    ) -> Result<Vec<LineRecord>, RepositoryError> {
        active_entry(&self.db, entry_id).await?;
        entry_lines(&self.db, entry_id).await
    }

    /// Lists lines posted to an active account from active entries, newest
    /// entry first.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is missing or soft-deleted.
    pub async fn list_account_lines(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<LineRecord>, RepositoryError> {
        let account_active = find_account(&self.db, account_id)
            .await?
            .is_some_and(|a| a.lifecycle.is_active());
        if !account_active {
            return Err(LedgerError::AccountNotFound(account_id).into());
        }

        journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntries.def())
            .filter(not_deleted(journal_entries::Column::DeletedAt))
            .order_by_desc(journal_entries::Column::OccurredAt)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .order_by_asc(journal_lines::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| LineRecord::try_from(model).map_err(RepositoryError::from))
            .collect()
    }

    /// Re-checks the entry balance over the line set after a mutation, if the
    /// policy asks for it.
    async fn check_balance<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry_id: EntryId,
        line_id: LineId,
        replacement: Option<LineRecord>,
    ) -> Result<(), RepositoryError> {
        if !self.policy.enforces_balance() {
            return Ok(());
        }

        let lines = entry_lines(conn, entry_id).await?;
        let resulting = LineMutator::resulting_lines(lines, line_id, replacement);
        LineMutator::check_balance(self.policy, &resulting)?;
        debug!(
            entry_id = %entry_id,
            lines = resulting.len(),
            "Entry still balanced after line mutation"
        );
        Ok(())
    }
}

async fn existing_line<C: ConnectionTrait>(
    conn: &C,
    line_id: LineId,
) -> Result<LineRecord, RepositoryError> {
    find_line(conn, line_id)
        .await?
        .ok_or_else(|| LedgerError::LineNotFound(line_id).into())
}
