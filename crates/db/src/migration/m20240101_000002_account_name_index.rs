//! Unique account name per owner among non-deleted accounts.
//!
//! Partial indexes are not expressible through the schema builder, so this
//! one is plain SQL understood by both `PostgreSQL` and `SQLite`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ACCOUNT_NAME_INDEX_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP INDEX IF EXISTS uq_ledger_accounts_owner_name_active;")
            .await?;
        Ok(())
    }
}

const ACCOUNT_NAME_INDEX_SQL: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS uq_ledger_accounts_owner_name_active
    ON ledger_accounts (owner_id, name)
    WHERE deleted_at IS NULL;
";
