//! `SeaORM` entity definitions.
//!
//! Rows keep their storage shape (`Uuid` keys, text codes, integer minor
//! units); conversion into core records happens in [`convert`].

pub mod convert;
pub mod journal_entries;
pub mod journal_lines;
pub mod ledger_accounts;
pub mod owners;

pub mod prelude {
    //! Entity aliases.
    pub use super::journal_entries::Entity as JournalEntries;
    pub use super::journal_lines::Entity as JournalLines;
    pub use super::ledger_accounts::Entity as LedgerAccounts;
    pub use super::owners::Entity as Owners;
}

use sea_orm::ColumnTrait;
use sea_orm::sea_query::SimpleExpr;

/// Condition selecting rows that are not soft-deleted.
///
/// Every query over accounts or entries that must ignore removed rows goes
/// through this helper.
pub fn not_deleted<C: ColumnTrait>(deleted_at: C) -> SimpleExpr {
    deleted_at.is_null()
}
