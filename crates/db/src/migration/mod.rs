//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and stay portable across
//! `PostgreSQL` and `SQLite`.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_ledger;
mod m20240101_000002_account_name_index;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_ledger::Migration),
            Box::new(m20240101_000002_account_name_index::Migration),
        ]
    }
}
