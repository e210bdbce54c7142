//! Report repository for financial report database operations.
//!
//! Each report loads accounts and postings inside one read transaction, then
//! hands them to the core aggregator and report service.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tally_core::ledger::{AccountRecord, BalanceAggregator, BalanceQuery, Statement};
use tally_core::reports::{
    AccountBalanceReport, AccountMovementsReport, BalanceSheetParams, BalanceSheetReport,
    IncomeStatementParams, IncomeStatementReport, MovementParams, ReportError, ReportService,
};
use tally_shared::types::{AccountId, DateWindow, OwnerId};
use tracing::info;

use super::RepositoryError;
use super::lookup::{PostingScope, find_account, load_postings, owner_accounts, owner_exists};

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Raw debit and credit totals of an account up to `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is missing or soft-deleted.
    pub async fn get_account_balance(
        &self,
        account_id: AccountId,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<AccountBalanceReport, RepositoryError> {
        let window = as_of.map_or_else(DateWindow::unbounded, DateWindow::until);

        let txn = self.db.begin().await?;
        report_account(&txn, account_id).await?;
        let postings = load_postings(&txn, PostingScope::Account(account_id), window).await?;
        txn.commit().await?;

        let totals = BalanceAggregator::totals_for(account_id, window, &postings);
        Ok(ReportService::account_balance(&totals, as_of))
    }

    /// Balance sheet of an owner as of `params.as_of`.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the owner does not exist.
    pub async fn get_balance_sheet(
        &self,
        owner_id: OwnerId,
        params: &BalanceSheetParams,
    ) -> Result<BalanceSheetReport, RepositoryError> {
        let query = BalanceQuery::for_owner(owner_id)
            .with_kinds(Statement::BalanceSheet.kinds())
            .within(params.window());

        let txn = self.db.begin().await?;
        let accounts = report_accounts(&txn, owner_id).await?;
        let postings = load_postings(&txn, PostingScope::Owner(owner_id), params.window()).await?;
        txn.commit().await?;

        let aggregates = BalanceAggregator::aggregate(&query, &accounts, &postings);
        let report = ReportService::generate_balance_sheet(params, aggregates);

        info!(
            owner_id = %owner_id,
            as_of = %report.as_of,
            total_assets = %report.totals.total_assets,
            "Balance sheet generated"
        );
        Ok(report)
    }

    /// Income statement of an owner over the params period.
    ///
    /// # Errors
    ///
    /// Returns `OwnerNotFound` if the owner does not exist.
    pub async fn get_income_statement(
        &self,
        owner_id: OwnerId,
        params: &IncomeStatementParams,
    ) -> Result<IncomeStatementReport, RepositoryError> {
        let query = BalanceQuery::for_owner(owner_id)
            .with_kinds(Statement::IncomeStatement.kinds())
            .within(params.window());

        let txn = self.db.begin().await?;
        let accounts = report_accounts(&txn, owner_id).await?;
        let postings = load_postings(&txn, PostingScope::Owner(owner_id), params.window()).await?;
        txn.commit().await?;

        let aggregates = BalanceAggregator::aggregate(&query, &accounts, &postings);
        let report = ReportService::generate_income_statement(params, aggregates);

        info!(
            owner_id = %owner_id,
            net_income = %report.totals.net_income,
            "Income statement generated"
        );
        Ok(report)
    }

    /// Movements of one account with a running balance.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account is missing or soft-deleted.
    pub async fn get_account_movements(
        &self,
        account_id: AccountId,
        params: &MovementParams,
    ) -> Result<AccountMovementsReport, RepositoryError> {
        let txn = self.db.begin().await?;
        let account = report_account(&txn, account_id).await?;
        let postings = load_postings(&txn, PostingScope::Account(account_id), params.window).await?;
        txn.commit().await?;

        let report = ReportService::generate_account_movements(&account, params, postings);

        info!(
            account_id = %account_id,
            movements = report.movements.len(),
            final_balance = %report.final_balance,
            "Account movements generated"
        );
        Ok(report)
    }
}

async fn report_account<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
) -> Result<AccountRecord, RepositoryError> {
    find_account(conn, account_id)
        .await?
        .filter(|a| a.lifecycle.is_active())
        .ok_or_else(|| ReportError::AccountNotFound(account_id).into())
}

async fn report_accounts<C: ConnectionTrait>(
    conn: &C,
    owner_id: OwnerId,
) -> Result<Vec<AccountRecord>, RepositoryError> {
    if !owner_exists(conn, owner_id).await? {
        return Err(ReportError::OwnerNotFound(owner_id).into());
    }
    owner_accounts(conn, owner_id).await
}
