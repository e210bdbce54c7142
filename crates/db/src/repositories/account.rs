//! Account repository for chart of accounts operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tally_core::ledger::account::{normalize_name, resolve_changes, validate_suffix};
use tally_core::ledger::{AccountChanges, AccountKind, AccountRecord, LedgerError};
use tally_shared::types::{AccountId, OwnerId};
use tracing::info;

use super::RepositoryError;
use super::lookup::{account_has_lines, find_account, owner_exists};
use crate::entities::{ledger_accounts, not_deleted};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning user.
    pub owner_id: OwnerId,
    /// Display name, unique per owner among active accounts.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Optional 4-character suffix (e.g. last digits of a card).
    pub suffix: Option<String>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The owner does not exist
    /// - The name is blank or the suffix is not 4 characters
    /// - An active account of the owner already has this name
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<AccountRecord, RepositoryError> {
        let name = normalize_name(&input.name)?;
        let suffix = validate_suffix(input.suffix.as_deref())?;

        let txn = self.db.begin().await?;

        if !owner_exists(&txn, input.owner_id).await? {
            return Err(LedgerError::OwnerNotFound(input.owner_id).into());
        }
        if name_taken(&txn, input.owner_id, &name, None).await? {
            return Err(LedgerError::DuplicateAccountName(name).into());
        }

        let now = Utc::now();
        let account = ledger_accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            owner_id: Set(input.owner_id.into_inner()),
            name: Set(name.clone()),
            kind: Set(input.kind.as_str().to_string()),
            suffix: Set(suffix),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };
        let account = account
            .insert(&txn)
            .await
            .map_err(|err| duplicate_name(err.into(), &name))?;

        txn.commit().await?;

        info!(
            account_id = %account.id,
            owner_id = %input.owner_id,
            kind = %input.kind,
            "Account created"
        );
        Ok(AccountRecord::try_from(account)?)
    }

    /// Finds an active account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is missing or soft-deleted.
    pub async fn find_account(
        &self,
        account_id: AccountId,
    ) -> Result<AccountRecord, RepositoryError> {
        active_account(&self.db, account_id).await
    }

    /// Lists active accounts of an owner, optionally of one kind, by name.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the owner does not exist.
    pub async fn list_accounts(
        &self,
        owner_id: OwnerId,
        kind: Option<AccountKind>,
    ) -> Result<Vec<AccountRecord>, RepositoryError> {
        if !owner_exists(&self.db, owner_id).await? {
            return Err(LedgerError::OwnerNotFound(owner_id).into());
        }

        let mut query = ledger_accounts::Entity::find()
            .filter(ledger_accounts::Column::OwnerId.eq(owner_id.into_inner()))
            .filter(not_deleted(ledger_accounts::Column::DeletedAt))
            .order_by_asc(ledger_accounts::Column::Name);

        if let Some(kind) = kind {
            query = query.filter(ledger_accounts::Column::Kind.eq(kind.as_str()));
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| AccountRecord::try_from(model).map_err(RepositoryError::from))
            .collect()
    }

    /// Updates the name, kind or suffix of an active account.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account is missing or soft-deleted
    /// - The new name collides with another active account of the owner
    /// - The kind changes while lines reference the account
    pub async fn update_account(
        &self,
        account_id: AccountId,
        changes: AccountChanges,
    ) -> Result<AccountRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let account = active_account(&txn, account_id).await?;
        let has_lines = match changes.kind {
            Some(kind) if kind != account.kind => account_has_lines(&txn, account_id).await?,
            _ => false,
        };
        let resolved = resolve_changes(&account, &changes, has_lines)?;

        if let Some(name) = resolved.rename_target(&account)
            && name_taken(&txn, account.owner_id, name, Some(account_id)).await?
        {
            return Err(LedgerError::DuplicateAccountName(name.to_string()).into());
        }

        let mut active = ledger_accounts::ActiveModel {
            id: Set(account_id.into_inner()),
            ..Default::default()
        };
        if let Some(name) = &resolved.name {
            active.name = Set(name.clone());
        }
        if let Some(kind) = resolved.kind {
            active.kind = Set(kind.as_str().to_string());
        }
        if let Some(suffix) = &resolved.suffix {
            active.suffix = Set(Some(suffix.clone()));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(|err| {
            duplicate_name(err.into(), resolved.name.as_deref().unwrap_or(&account.name))
        })?;

        txn.commit().await?;

        info!(account_id = %account_id, "Account updated");
        Ok(AccountRecord::try_from(updated)?)
    }

    /// Soft-deletes an active account.
    ///
    /// Lines posted to it stay in place; statements skip the account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is missing or already deleted.
    pub async fn soft_delete_account(&self, account_id: AccountId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        active_account(&txn, account_id).await?;
        let now = Utc::now();
        let active = ledger_accounts::ActiveModel {
            id: Set(account_id.into_inner()),
            deleted_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };
        active.update(&txn).await?;

        txn.commit().await?;

        info!(account_id = %account_id, "Account soft-deleted");
        Ok(())
    }
}

async fn active_account<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<AccountRecord, RepositoryError> {
    find_account(conn, account_id)
        .await?
        .filter(|a| a.lifecycle.is_active())
        .ok_or_else(|| LedgerError::AccountNotFound(account_id).into())
}

async fn name_taken<C: ConnectionTrait>(
    conn: &C,
    owner_id: OwnerId,
    name: &str,
    except: Option<AccountId>,
) -> Result<bool, RepositoryError> {
    let mut query = ledger_accounts::Entity::find()
        .filter(ledger_accounts::Column::OwnerId.eq(owner_id.into_inner()))
        .filter(ledger_accounts::Column::Name.eq(name))
        .filter(not_deleted(ledger_accounts::Column::DeletedAt));
    if let Some(id) = except {
        query = query.filter(ledger_accounts::Column::Id.ne(id.into_inner()));
    }
    Ok(query.one(conn).await?.is_some())
}

/// Maps a unique-index rejection to the ledger's conflict error.
fn duplicate_name(err: RepositoryError, name: &str) -> RepositoryError {
    if err.is_unique_violation() {
        LedgerError::DuplicateAccountName(name.to_string()).into()
    } else {
        err
    }
}
