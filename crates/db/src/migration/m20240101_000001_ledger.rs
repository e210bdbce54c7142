//! Ledger schema: owners, accounts, entries and lines.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Owners {
    Table,
    Id,
    Email,
    DisplayName,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum LedgerAccounts {
    Table,
    Id,
    OwnerId,
    Name,
    Kind,
    Suffix,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum JournalEntries {
    Table,
    Id,
    OwnerId,
    OccurredAt,
    Description,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum JournalLines {
    Table,
    Id,
    EntryId,
    AccountId,
    AmountMinor,
    Side,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Owners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Owners::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Owners::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Owners::DisplayName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Owners::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Owners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerAccounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerAccounts::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(LedgerAccounts::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerAccounts::Kind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerAccounts::Suffix).char_len(4))
                    .col(
                        ColumnDef::new(LedgerAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerAccounts::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_accounts-owner_id")
                            .from(LedgerAccounts::Table, LedgerAccounts::OwnerId)
                            .to(Owners::Table, Owners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_accounts-owner_id-kind")
                    .table(LedgerAccounts::Table)
                    .col(LedgerAccounts::OwnerId)
                    .col(LedgerAccounts::Kind)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalEntries::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalEntries::Description).text())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalEntries::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_entries-owner_id")
                            .from(JournalEntries::Table, JournalEntries::OwnerId)
                            .to(Owners::Table, Owners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journal_entries-owner_id-occurred_at")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::OwnerId)
                    .col(JournalEntries::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalLines::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JournalLines::EntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(JournalLines::AmountMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(JournalLines::AmountMinor).gt(0)),
                    )
                    .col(
                        ColumnDef::new(JournalLines::Side)
                            .char_len(1)
                            .not_null()
                            .check(Expr::col(JournalLines::Side).is_in(["D", "C"])),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_lines-entry_id")
                            .from(JournalLines::Table, JournalLines::EntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_lines-account_id")
                            .from(JournalLines::Table, JournalLines::AccountId)
                            .to(LedgerAccounts::Table, LedgerAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journal_lines-entry_id")
                    .table(JournalLines::Table)
                    .col(JournalLines::EntryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journal_lines-account_id")
                    .table(JournalLines::Table)
                    .col(JournalLines::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Owners::Table).to_owned())
            .await?;
        Ok(())
    }
}
