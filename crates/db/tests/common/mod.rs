//! Shared setup for repository integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tally_core::ledger::{
    AccountKind, AccountRecord, CreateEntryInput, EntryWithLines, NewLineInput, OwnerRecord, Side,
};
use tally_db::migration::Migrator;
use tally_db::repositories::{
    AccountRepository, CreateAccountInput, CreateOwnerInput, EntryRepository, OwnerRepository,
};

pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn debit(account: &AccountRecord, amount: Decimal) -> NewLineInput {
    NewLineInput {
        account_id: account.id,
        amount,
        side: Side::Debit,
    }
}

pub fn credit(account: &AccountRecord, amount: Decimal) -> NewLineInput {
    NewLineInput {
        account_id: account.id,
        amount,
        side: Side::Credit,
    }
}

pub async fn create_owner(db: &DatabaseConnection, email: &str) -> OwnerRecord {
    OwnerRepository::new(db.clone())
        .create_owner(CreateOwnerInput {
            email: email.to_string(),
            display_name: "Test Owner".to_string(),
        })
        .await
        .unwrap()
}

pub async fn create_account(
    db: &DatabaseConnection,
    owner: &OwnerRecord,
    name: &str,
    kind: AccountKind,
) -> AccountRecord {
    AccountRepository::new(db.clone())
        .create_account(CreateAccountInput {
            owner_id: owner.id,
            name: name.to_string(),
            kind,
            suffix: None,
        })
        .await
        .unwrap()
}

pub async fn post(
    db: &DatabaseConnection,
    owner: &OwnerRecord,
    at: DateTime<Utc>,
    lines: Vec<NewLineInput>,
) -> EntryWithLines {
    EntryRepository::new(db.clone())
        .create_balanced_entry(CreateEntryInput {
            owner_id: owner.id,
            occurred_at: at,
            description: None,
            lines,
        })
        .await
        .unwrap()
}

/// Owner with Cash (asset) and Revenue (income) accounts.
pub struct Ledger {
    pub db: DatabaseConnection,
    pub owner: OwnerRecord,
    pub cash: AccountRecord,
    pub revenue: AccountRecord,
}

pub async fn ledger() -> Ledger {
    let db = setup().await;
    let owner = create_owner(&db, "u@example.com").await;
    let cash = create_account(&db, &owner, "Cash", AccountKind::Asset).await;
    let revenue = create_account(&db, &owner, "Revenue", AccountKind::Income).await;
    Ledger {
        db,
        owner,
        cash,
        revenue,
    }
}
