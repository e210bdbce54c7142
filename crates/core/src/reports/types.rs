//! Report data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Amount, EntryId, LineId};

use crate::ledger::{AccountKind, Side};

/// One account row on a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account name.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Account suffix.
    pub suffix: Option<String>,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Signed balance under the statement's convention.
    pub balance: Decimal,
}

/// Balance sheet totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetTotals {
    /// Sum of asset balances.
    pub total_assets: Decimal,
    /// Sum of liability balances.
    pub total_liabilities: Decimal,
    /// Sum of equity balances as recorded in the ledger.
    pub total_equity: Decimal,
    /// Assets minus liabilities. Not forced to match `total_equity`.
    pub calculated_equity: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of instant (inclusive).
    pub as_of: DateTime<Utc>,
    /// Asset accounts.
    pub assets: Vec<StatementLine>,
    /// Liability accounts.
    pub liabilities: Vec<StatementLine>,
    /// Equity accounts.
    pub equity: Vec<StatementLine>,
    /// Totals.
    pub totals: BalanceSheetTotals,
}

/// Income statement totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementTotals {
    /// Sum of income (credits - debits).
    pub total_income: Decimal,
    /// Sum of expenses (debits - credits).
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net_income: Decimal,
}

/// Income statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period start (inclusive).
    pub period_start: DateTime<Utc>,
    /// Period end (inclusive).
    pub period_end: DateTime<Utc>,
    /// Income accounts with activity in the period.
    pub income: Vec<StatementLine>,
    /// Expense accounts with activity in the period.
    pub expenses: Vec<StatementLine>,
    /// Totals.
    pub totals: IncomeStatementTotals,
}

/// One posting on an account movements report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Line ID.
    pub line_id: LineId,
    /// Entry ID.
    pub entry_id: EntryId,
    /// Entry business date.
    pub occurred_at: DateTime<Utc>,
    /// Entry description.
    pub description: Option<String>,
    /// Debit or credit.
    pub side: Side,
    /// Posted amount.
    pub amount: Amount,
    /// Balance after this posting (debits add, credits subtract).
    pub running_balance: Decimal,
}

/// Account movements report, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMovementsReport {
    /// Report type identifier.
    pub report_type: String,
    /// Account ID.
    pub account_id: AccountId,
    /// Account name.
    pub account_name: String,
    /// Window start, if bounded.
    pub start: Option<DateTime<Utc>>,
    /// Window end, if bounded.
    pub end: Option<DateTime<Utc>>,
    /// Movements, oldest first.
    pub movements: Vec<Movement>,
    /// Terminal running balance (zero when there are no movements).
    pub final_balance: Decimal,
}

/// Raw balance of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalanceReport {
    /// Account ID.
    pub account_id: AccountId,
    /// As of instant, if bounded.
    pub as_of: Option<DateTime<Utc>>,
    /// Total debit amount.
    pub debits: Decimal,
    /// Total credit amount.
    pub credits: Decimal,
}

impl AccountBalanceReport {
    /// Debits minus credits.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debits - self.credits
    }
}
