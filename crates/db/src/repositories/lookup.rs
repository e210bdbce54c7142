//! Row loaders shared by the repositories.
//!
//! All loaders are generic over the connection so they run the same on the
//! pool and inside an open transaction.

use std::collections::HashMap;

use sea_orm::sea_query::Condition;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tally_core::ledger::{AccountRecord, EntryRecord, LineRecord, Posting};
use tally_shared::types::{AccountId, DateWindow, EntryId, LineId, OwnerId};

use super::RepositoryError;
use crate::entities::convert::posting;
use crate::entities::{journal_entries, journal_lines, ledger_accounts, not_deleted, owners};

pub(crate) async fn owner_exists<C: ConnectionTrait>(
    conn: &C,
    owner_id: OwnerId,
) -> Result<bool, DbErr> {
    let count = owners::Entity::find_by_id(owner_id.into_inner())
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Loads an account whatever its lifecycle.
pub(crate) async fn find_account<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<Option<AccountRecord>, RepositoryError> {
    let model = ledger_accounts::Entity::find_by_id(account_id.into_inner())
        .one(conn)
        .await?;
    Ok(model.map(AccountRecord::try_from).transpose()?)
}

/// Loads several accounts whatever their lifecycle, keyed by id.
pub(crate) async fn find_accounts<C: ConnectionTrait>(
    conn: &C,
    account_ids: impl IntoIterator<Item = AccountId>,
) -> Result<HashMap<AccountId, AccountRecord>, RepositoryError> {
    let ids: Vec<_> = account_ids.into_iter().map(AccountId::into_inner).collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    ledger_accounts::Entity::find()
        .filter(ledger_accounts::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|model| {
            AccountRecord::try_from(model)
                .map(|account| (account.id, account))
                .map_err(RepositoryError::from)
        })
        .collect()
}

/// Active accounts of an owner ordered by name.
pub(crate) async fn owner_accounts<C: ConnectionTrait>(
    conn: &C,
    owner_id: OwnerId,
) -> Result<Vec<AccountRecord>, RepositoryError> {
    ledger_accounts::Entity::find()
        .filter(ledger_accounts::Column::OwnerId.eq(owner_id.into_inner()))
        .filter(not_deleted(ledger_accounts::Column::DeletedAt))
        .order_by_asc(ledger_accounts::Column::Name)
        .all(conn)
        .await?
        .into_iter()
        .map(|model| AccountRecord::try_from(model).map_err(RepositoryError::from))
        .collect()
}

pub(crate) async fn account_has_lines<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<bool, DbErr> {
    let count = journal_lines::Entity::find()
        .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Loads an entry whatever its lifecycle.
pub(crate) async fn find_entry<C: ConnectionTrait>(
    conn: &C,
    entry_id: EntryId,
) -> Result<Option<EntryRecord>, DbErr> {
    let model = journal_entries::Entity::find_by_id(entry_id.into_inner())
        .one(conn)
        .await?;
    Ok(model.map(EntryRecord::from))
}

pub(crate) async fn find_line<C: ConnectionTrait>(
    conn: &C,
    line_id: LineId,
) -> Result<Option<LineRecord>, RepositoryError> {
    let model = journal_lines::Entity::find_by_id(line_id.into_inner())
        .one(conn)
        .await?;
    Ok(model.map(LineRecord::try_from).transpose()?)
}

/// Lines of an entry in creation order.
pub(crate) async fn entry_lines<C: ConnectionTrait>(
    conn: &C,
    entry_id: EntryId,
) -> Result<Vec<LineRecord>, RepositoryError> {
    journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id.into_inner()))
        .order_by_asc(journal_lines::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|model| LineRecord::try_from(model).map_err(RepositoryError::from))
        .collect()
}

/// Which lines a posting load covers.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PostingScope {
    Owner(OwnerId),
    Account(AccountId),
}

impl PostingScope {
    fn condition(self) -> Condition {
        match self {
            Self::Owner(id) => {
                Condition::all().add(journal_entries::Column::OwnerId.eq(id.into_inner()))
            }
            Self::Account(id) => {
                Condition::all().add(journal_lines::Column::AccountId.eq(id.into_inner()))
            }
        }
    }
}

/// Loads postings of active entries within `window`.
///
/// The core aggregator re-applies the same filters, so this only narrows
/// what is read.
pub(crate) async fn load_postings<C: ConnectionTrait>(
    conn: &C,
    scope: PostingScope,
    window: DateWindow,
) -> Result<Vec<Posting>, RepositoryError> {
    let mut query = journal_lines::Entity::find()
        .find_also_related(journal_entries::Entity)
        .filter(scope.condition())
        .filter(not_deleted(journal_entries::Column::DeletedAt));

    if let Some(start) = window.start() {
        query = query.filter(journal_entries::Column::OccurredAt.gte(start));
    }
    if let Some(end) = window.end() {
        query = query.filter(journal_entries::Column::OccurredAt.lte(end));
    }

    query
        .all(conn)
        .await?
        .into_iter()
        .filter_map(|(line, entry)| entry.map(|entry| (line, entry)))
        .map(|(line, entry)| posting(line, &entry).map_err(RepositoryError::from))
        .collect()
}
