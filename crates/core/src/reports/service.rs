//! Report generation service.
//!
//! Every generator takes already-aggregated or already-loaded data; none of
//! them touch storage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_shared::types::ZERO_AMOUNT;

use super::params::{BalanceSheetParams, IncomeStatementParams, MovementParams};
use super::types::{
    AccountBalanceReport, AccountMovementsReport, BalanceSheetReport, BalanceSheetTotals,
    IncomeStatementReport, IncomeStatementTotals, Movement, StatementLine,
};
use crate::ledger::{
    AccountAggregate, AccountKind, AccountRecord, AccountTotals, Posting, RunningBalance,
    SignConvention, Statement,
};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a balance sheet from aggregates of the owner's accounts.
    ///
    /// Every asset, liability and equity aggregate produces a row, including
    /// accounts with no activity. `calculated_equity` is assets minus
    /// liabilities and is reported next to the ledger equity total without
    /// forcing the two to agree.
    #[must_use]
    pub fn generate_balance_sheet(
        params: &BalanceSheetParams,
        aggregates: Vec<AccountAggregate>,
    ) -> BalanceSheetReport {
        let mut assets = Vec::new();
        let mut liabilities = Vec::new();
        let mut equity = Vec::new();

        for aggregate in aggregates {
            let Some(line) = Self::statement_line(Statement::BalanceSheet, aggregate) else {
                continue;
            };
            match line.kind {
                AccountKind::Asset => assets.push(line),
                AccountKind::Liability => liabilities.push(line),
                AccountKind::Equity => equity.push(line),
                AccountKind::Income | AccountKind::Expense => {}
            }
        }

        let total_assets = Self::sum(&assets);
        let total_liabilities = Self::sum(&liabilities);
        let total_equity = Self::sum(&equity);

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of: params.as_of,
            assets,
            liabilities,
            equity,
            totals: BalanceSheetTotals {
                total_assets,
                total_liabilities,
                total_equity,
                calculated_equity: total_assets - total_liabilities,
            },
        }
    }

    /// Generates an income statement from aggregates over the period.
    ///
    /// Only accounts with at least one posting in the period produce rows.
    #[must_use]
    pub fn generate_income_statement(
        params: &IncomeStatementParams,
        aggregates: Vec<AccountAggregate>,
    ) -> IncomeStatementReport {
        let mut income = Vec::new();
        let mut expenses = Vec::new();

        for aggregate in aggregates
            .into_iter()
            .filter(|a| a.totals.has_activity())
        {
            let Some(line) = Self::statement_line(Statement::IncomeStatement, aggregate) else {
                continue;
            };
            match line.kind {
                AccountKind::Income => income.push(line),
                AccountKind::Expense => expenses.push(line),
                AccountKind::Asset | AccountKind::Liability | AccountKind::Equity => {}
            }
        }

        let total_income = Self::sum(&income);
        let total_expenses = Self::sum(&expenses);

        IncomeStatementReport {
            report_type: "income_statement".to_string(),
            period_start: params.start(),
            period_end: params.end(),
            income,
            expenses,
            totals: IncomeStatementTotals {
                total_income,
                total_expenses,
                net_income: total_income - total_expenses,
            },
        }
    }

    /// Generates the movements of one account.
    ///
    /// Postings are filtered to the account, to active entries and to the
    /// window, then ordered oldest first by business date, entry creation
    /// time and line id. The running balance starts at zero, adds debits and
    /// subtracts credits, whatever order `postings` arrive in.
    #[must_use]
    pub fn generate_account_movements(
        account: &AccountRecord,
        params: &MovementParams,
        postings: Vec<Posting>,
    ) -> AccountMovementsReport {
        let mut selected: Vec<Posting> = postings
            .into_iter()
            .filter(|p| {
                p.account_id == account.id
                    && p.entry_lifecycle.is_active()
                    && params.window.contains(p.occurred_at)
            })
            .collect();
        selected.sort_by_key(Posting::chronological_key);

        let convention = SignConvention::for_statement(Statement::Movements, account.kind)
            .unwrap_or(SignConvention::DebitNormal);
        let balances = RunningBalance::chain(selected.iter().map(|p| {
            let (debit, credit) = p.side_amounts();
            convention.apply(debit, credit)
        }));

        let movements: Vec<Movement> = selected
            .into_iter()
            .zip(&balances)
            .map(|(p, rb)| Movement {
                line_id: p.line_id,
                entry_id: p.entry_id,
                occurred_at: p.occurred_at,
                description: p.description,
                side: p.side,
                amount: p.amount,
                running_balance: rb.current_balance,
            })
            .collect();

        AccountMovementsReport {
            report_type: "account_movements".to_string(),
            account_id: account.id,
            account_name: account.name.clone(),
            start: params.window.start(),
            end: params.window.end(),
            final_balance: balances.last().map_or(ZERO_AMOUNT, |rb| rb.current_balance),
            movements,
        }
    }

    /// Wraps raw totals as an account balance.
    #[must_use]
    pub const fn account_balance(
        totals: &AccountTotals,
        as_of: Option<DateTime<Utc>>,
    ) -> AccountBalanceReport {
        AccountBalanceReport {
            account_id: totals.account_id,
            as_of,
            debits: totals.debits,
            credits: totals.credits,
        }
    }

    fn statement_line(statement: Statement, aggregate: AccountAggregate) -> Option<StatementLine> {
        let AccountAggregate { account, totals } = aggregate;
        let convention = SignConvention::for_statement(statement, account.kind)?;
        Some(StatementLine {
            account_id: account.id,
            name: account.name,
            kind: account.kind,
            suffix: account.suffix,
            total_debit: totals.debits,
            total_credit: totals.credits,
            balance: totals.balance(convention),
        })
    }

    fn sum(lines: &[StatementLine]) -> Decimal {
        lines.iter().fold(ZERO_AMOUNT, |total, l| total + l.balance)
    }
}
