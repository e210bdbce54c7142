//! Account balance calculations.
//!
//! The aggregator turns raw postings into per-account debit/credit totals.
//! Signing those totals is left to the statement that consumes them, via
//! [`SignConvention::for_statement`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{
    AccountId, Amount, DateWindow, EntryId, LineId, OwnerId, ZERO_AMOUNT,
};

use super::types::{AccountKind, AccountRecord, Lifecycle, Side};

/// How debit and credit totals combine into a signed balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignConvention {
    /// balance = debits - credits
    DebitNormal,
    /// balance = credits - debits
    CreditNormal,
}

impl SignConvention {
    /// Calculates the signed balance.
    #[must_use]
    pub fn apply(self, debits: Decimal, credits: Decimal) -> Decimal {
        match self {
            Self::DebitNormal => debits - credits,
            Self::CreditNormal => credits - debits,
        }
    }

    /// The convention a statement uses for an account kind, or `None` if
    /// the kind does not appear on that statement.
    ///
    /// | statement        | asset | liability | equity | income | expense |
    /// |------------------|-------|-----------|--------|--------|---------|
    /// | balance sheet    | D-C   | D-C       | D-C    |        |         |
    /// | income statement |       |           |        | C-D    | D-C     |
    /// | movements        | D-C   | D-C       | D-C    | D-C    | D-C     |
    #[must_use]
    pub const fn for_statement(statement: Statement, kind: AccountKind) -> Option<Self> {
        use AccountKind::{Asset, Equity, Expense, Income, Liability};
        match (statement, kind) {
            (Statement::BalanceSheet, Asset | Liability | Equity)
            | (Statement::IncomeStatement, Expense)
            | (Statement::Movements, _) => Some(Self::DebitNormal),
            (Statement::IncomeStatement, Income) => Some(Self::CreditNormal),
            (Statement::BalanceSheet, Income | Expense)
            | (Statement::IncomeStatement, Asset | Liability | Equity) => None,
        }
    }
}

/// Statements built from aggregated balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// Point-in-time position.
    BalanceSheet,
    /// Period performance.
    IncomeStatement,
    /// Per-account running ledger.
    Movements,
}

impl Statement {
    /// Account kinds that appear on this statement.
    #[must_use]
    pub fn kinds(self) -> Vec<AccountKind> {
        AccountKind::ALL
            .into_iter()
            .filter(|kind| SignConvention::for_statement(self, *kind).is_some())
            .collect()
    }
}

/// One line joined with its entry header, as read for aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Line ID.
    pub line_id: LineId,
    /// Owning entry.
    pub entry_id: EntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Positive amount.
    pub amount: Amount,
    /// Debit or credit.
    pub side: Side,
    /// Entry business date.
    pub occurred_at: DateTime<Utc>,
    /// Entry creation time, used as a tie-breaker.
    pub entry_created_at: DateTime<Utc>,
    /// Entry description.
    pub description: Option<String>,
    /// Entry soft-delete state.
    pub entry_lifecycle: Lifecycle,
}

impl Posting {
    /// Chronological ordering key: business date, then entry creation, then line id.
    #[must_use]
    pub fn chronological_key(&self) -> (DateTime<Utc>, DateTime<Utc>, LineId) {
        (self.occurred_at, self.entry_created_at, self.line_id)
    }

    /// `(debit, credit)` contribution of this posting.
    #[must_use]
    pub fn side_amounts(&self) -> (Decimal, Decimal) {
        match self.side {
            Side::Debit => (self.amount.value(), ZERO_AMOUNT),
            Side::Credit => (ZERO_AMOUNT, self.amount.value()),
        }
    }
}

/// Raw debit/credit totals of one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotals {
    /// The account ID.
    pub account_id: AccountId,
    /// Total debit amount.
    pub debits: Decimal,
    /// Total credit amount.
    pub credits: Decimal,
    /// Number of contributing postings.
    pub posting_count: usize,
}

impl AccountTotals {
    /// Zero totals for an account.
    #[must_use]
    pub const fn empty(account_id: AccountId) -> Self {
        Self {
            account_id,
            debits: ZERO_AMOUNT,
            credits: ZERO_AMOUNT,
            posting_count: 0,
        }
    }

    /// Adds one posting.
    pub fn add(&mut self, side: Side, amount: Amount) {
        match side {
            Side::Debit => self.debits += amount.value(),
            Side::Credit => self.credits += amount.value(),
        }
        self.posting_count += 1;
    }

    /// Signed balance under `convention`.
    #[must_use]
    pub fn balance(&self, convention: SignConvention) -> Decimal {
        convention.apply(self.debits, self.credits)
    }

    /// Returns true if any posting contributed.
    #[must_use]
    pub const fn has_activity(&self) -> bool {
        self.posting_count > 0
    }
}

/// Selection criteria for the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceQuery {
    /// Owner whose accounts are aggregated.
    pub owner_id: Option<OwnerId>,
    /// Restrict to these accounts.
    pub account_ids: Option<Vec<AccountId>>,
    /// Restrict to these kinds.
    pub kinds: Option<Vec<AccountKind>>,
    /// Window over entry occurrence.
    pub window: DateWindow,
}

impl BalanceQuery {
    /// All accounts of an owner, unbounded in time.
    #[must_use]
    pub fn for_owner(owner_id: OwnerId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    /// A single account.
    #[must_use]
    pub fn for_account(account_id: AccountId) -> Self {
        Self {
            account_ids: Some(vec![account_id]),
            ..Self::default()
        }
    }

    /// Restricts to the given kinds.
    #[must_use]
    pub fn with_kinds(mut self, kinds: Vec<AccountKind>) -> Self {
        self.kinds = Some(kinds);
        self
    }

    /// Restricts to a window.
    #[must_use]
    pub const fn within(mut self, window: DateWindow) -> Self {
        self.window = window;
        self
    }

    /// Returns true if `account` is selected (and active).
    #[must_use]
    pub fn selects_account(&self, account: &AccountRecord) -> bool {
        account.lifecycle.is_active()
            && self.owner_id.is_none_or(|owner| account.owner_id == owner)
            && self
                .account_ids
                .as_ref()
                .is_none_or(|ids| ids.contains(&account.id))
            && self
                .kinds
                .as_ref()
                .is_none_or(|kinds| kinds.contains(&account.kind))
    }

    /// Returns true if `posting` counts toward totals.
    #[must_use]
    pub fn selects_posting(&self, posting: &Posting) -> bool {
        posting.entry_lifecycle.is_active() && self.window.contains(posting.occurred_at)
    }
}

/// An account with its aggregated totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountAggregate {
    /// The account.
    pub account: AccountRecord,
    /// Its totals.
    pub totals: AccountTotals,
}

/// Computes per-account totals from postings.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Aggregates `postings` onto the accounts selected by `query`.
    ///
    /// Every selected account gets a result, with zero totals if nothing was
    /// posted to it. Postings on unselected accounts, soft-deleted entries,
    /// or outside the window are ignored. Output follows `accounts` order.
    #[must_use]
    pub fn aggregate(
        query: &BalanceQuery,
        accounts: &[AccountRecord],
        postings: &[Posting],
    ) -> Vec<AccountAggregate> {
        let mut totals: HashMap<AccountId, AccountTotals> = accounts
            .iter()
            .filter(|a| query.selects_account(a))
            .map(|a| (a.id, AccountTotals::empty(a.id)))
            .collect();

        for posting in postings.iter().filter(|p| query.selects_posting(p)) {
            if let Some(t) = totals.get_mut(&posting.account_id) {
                t.add(posting.side, posting.amount);
            }
        }

        accounts
            .iter()
            .filter_map(|account| {
                totals.remove(&account.id).map(|totals| AccountAggregate {
                    account: account.clone(),
                    totals,
                })
            })
            .collect()
    }

    /// Totals of a single account over `postings`, without account filtering.
    #[must_use]
    pub fn totals_for(
        account_id: AccountId,
        window: DateWindow,
        postings: &[Posting],
    ) -> AccountTotals {
        let query = BalanceQuery::default().within(window);
        postings
            .iter()
            .filter(|p| p.account_id == account_id && query.selects_posting(p))
            .fold(AccountTotals::empty(account_id), |mut acc, p| {
                acc.add(p.side, p.amount);
                acc
            })
    }
}

/// Running balance after one posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// 1-based position in the sequence.
    pub sequence: u64,
    /// Balance before this posting.
    pub previous_balance: Decimal,
    /// Balance after this posting.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Running balance for the first posting in a window.
    #[must_use]
    pub fn first(change: Decimal) -> Self {
        Self {
            sequence: 1,
            previous_balance: ZERO_AMOUNT,
            current_balance: change,
        }
    }

    /// Running balance following `previous`.
    #[must_use]
    pub fn next(previous: &Self, change: Decimal) -> Self {
        Self {
            sequence: previous.sequence + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + change,
        }
    }

    /// Running balances for a sequence of changes, in order.
    #[must_use]
    pub fn chain(changes: impl IntoIterator<Item = Decimal>) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::new();
        for change in changes {
            let next = match out.last() {
                Some(prev) => Self::next(prev, change),
                None => Self::first(change),
            };
            out.push(next);
        }
        out
    }
}
