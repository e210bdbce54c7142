//! Tests for report generation, including property-based tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::{AccountId, Amount, DateWindow, EntryId, LineId, OwnerId};

use super::params::{BalanceSheetParams, IncomeStatementParams, MovementParams};
use super::service::ReportService;
use crate::ledger::{
    AccountAggregate, AccountKind, AccountRecord, AccountTotals, BalanceAggregator, BalanceQuery,
    Lifecycle, Posting, Side, Statement,
};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

fn account(owner_id: OwnerId, name: &str, kind: AccountKind) -> AccountRecord {
    AccountRecord {
        id: AccountId::new(),
        owner_id,
        name: name.to_string(),
        kind,
        suffix: None,
        created_at: day(1),
        updated_at: day(1),
        lifecycle: Lifecycle::Active,
    }
}

fn posting(
    account: &AccountRecord,
    entry_id: EntryId,
    amount: Decimal,
    side: Side,
    occurred_at: DateTime<Utc>,
) -> Posting {
    Posting {
        line_id: LineId::new(),
        entry_id,
        account_id: account.id,
        amount: Amount::new(amount).unwrap(),
        side,
        occurred_at,
        entry_created_at: occurred_at,
        description: Some("test".to_string()),
        entry_lifecycle: Lifecycle::Active,
    }
}

fn aggregate(account: &AccountRecord, debits: Decimal, credits: Decimal) -> AccountAggregate {
    AccountAggregate {
        account: account.clone(),
        totals: AccountTotals {
            account_id: account.id,
            debits,
            credits,
            posting_count: usize::from(debits + credits > Decimal::ZERO),
        },
    }
}

/// Owner U with Cash (asset) and Revenue (income); one sale on 2024-01-05.
struct SaleScenario {
    owner: OwnerId,
    cash: AccountRecord,
    revenue: AccountRecord,
    postings: Vec<Posting>,
}

impl SaleScenario {
    fn new() -> Self {
        let owner = OwnerId::new();
        let cash = account(owner, "Cash", AccountKind::Asset);
        let revenue = account(owner, "Revenue", AccountKind::Income);
        let entry = EntryId::new();
        let postings = vec![
            posting(&cash, entry, dec!(100.00), Side::Debit, day(5)),
            posting(&revenue, entry, dec!(100.00), Side::Credit, day(5)),
        ];
        Self {
            owner,
            cash,
            revenue,
            postings,
        }
    }

    fn accounts(&self) -> Vec<AccountRecord> {
        vec![self.cash.clone(), self.revenue.clone()]
    }

    fn aggregate(&self, statement: Statement, window: DateWindow) -> Vec<AccountAggregate> {
        let query = BalanceQuery::for_owner(self.owner)
            .with_kinds(statement.kinds())
            .within(window);
        BalanceAggregator::aggregate(&query, &self.accounts(), &self.postings)
    }
}

#[test]
fn test_sale_balance_sheet() {
    let s = SaleScenario::new();
    let params = BalanceSheetParams::parse(Some("2024-01-06"), Utc::now()).unwrap();
    let report = ReportService::generate_balance_sheet(
        &params,
        s.aggregate(Statement::BalanceSheet, params.window()),
    );

    assert_eq!(report.assets.len(), 1);
    assert_eq!(report.assets[0].name, "Cash");
    assert_eq!(report.assets[0].balance, dec!(100.00));
    assert_eq!(report.totals.total_assets, dec!(100.00));
    assert!(report.liabilities.is_empty());
    assert!(report.equity.is_empty());
    // Revenue has not been closed to equity, so the two equity figures differ.
    assert_eq!(report.totals.total_equity, Decimal::ZERO);
    assert_eq!(report.totals.calculated_equity, dec!(100.00));
}

#[test]
fn test_sale_income_statement() {
    let s = SaleScenario::new();
    let params = IncomeStatementParams::parse("2024-01-01", "2024-01-31").unwrap();
    let report = ReportService::generate_income_statement(
        &params,
        s.aggregate(Statement::IncomeStatement, params.window()),
    );

    assert_eq!(report.income.len(), 1);
    assert_eq!(report.income[0].name, "Revenue");
    assert_eq!(report.income[0].balance, dec!(100.00));
    assert!(report.expenses.is_empty());
    assert_eq!(report.totals.net_income, dec!(100.00));
}

#[test]
fn test_balance_sheet_before_sale_lists_zero_rows() {
    let s = SaleScenario::new();
    let params = BalanceSheetParams::parse(Some("2024-01-04"), Utc::now()).unwrap();
    let report = ReportService::generate_balance_sheet(
        &params,
        s.aggregate(Statement::BalanceSheet, params.window()),
    );
    assert_eq!(report.assets.len(), 1);
    assert_eq!(report.assets[0].balance, Decimal::ZERO);
    assert_eq!(report.totals.total_assets, Decimal::ZERO);
}

#[test]
fn test_income_statement_outside_period_is_empty() {
    let s = SaleScenario::new();
    let params = IncomeStatementParams::parse("2024-02-01", "2024-02-29").unwrap();
    let report = ReportService::generate_income_statement(
        &params,
        s.aggregate(Statement::IncomeStatement, params.window()),
    );
    assert!(report.income.is_empty());
    assert_eq!(report.totals.net_income, Decimal::ZERO);
}

#[test]
fn test_balance_sheet_uses_debit_minus_credit_for_every_kind() {
    let owner = OwnerId::new();
    let loan = account(owner, "Loan", AccountKind::Liability);
    let capital = account(owner, "Capital", AccountKind::Equity);
    let params = BalanceSheetParams::parse(None, day(10)).unwrap();

    let report = ReportService::generate_balance_sheet(
        &params,
        vec![
            aggregate(&loan, Decimal::ZERO, dec!(500)),
            aggregate(&capital, Decimal::ZERO, dec!(1000)),
        ],
    );

    assert_eq!(report.liabilities[0].balance, dec!(-500));
    assert_eq!(report.equity[0].balance, dec!(-1000));
    assert_eq!(report.totals.total_liabilities, dec!(-500));
    assert_eq!(report.totals.calculated_equity, dec!(500));
}

#[test]
fn test_income_statement_conventions() {
    let owner = OwnerId::new();
    let sales = account(owner, "Sales", AccountKind::Income);
    let refunds = account(owner, "Refunds", AccountKind::Income);
    let rent = account(owner, "Rent", AccountKind::Expense);
    let idle = account(owner, "Idle", AccountKind::Expense);
    let params = IncomeStatementParams::parse("2024-01-01", "2024-01-31").unwrap();

    let report = ReportService::generate_income_statement(
        &params,
        vec![
            aggregate(&sales, dec!(10), dec!(300)),
            aggregate(&refunds, dec!(25), Decimal::ZERO),
            aggregate(&rent, dec!(120), dec!(20)),
            aggregate(&idle, Decimal::ZERO, Decimal::ZERO),
        ],
    );

    assert_eq!(report.income.len(), 2);
    assert_eq!(report.income[0].balance, dec!(290));
    assert_eq!(report.income[1].balance, dec!(-25));
    assert_eq!(report.expenses.len(), 1);
    assert_eq!(report.expenses[0].balance, dec!(100));
    assert_eq!(report.totals.total_income, dec!(265));
    assert_eq!(report.totals.total_expenses, dec!(100));
    assert_eq!(report.totals.net_income, dec!(165));
}

#[test]
fn test_movements_sorted_oldest_first() {
    let s = SaleScenario::new();
    let later = EntryId::new();
    let mut postings = vec![posting(&s.cash, later, dec!(30.00), Side::Credit, day(9))];
    postings.extend(s.postings.iter().cloned());

    let report = ReportService::generate_account_movements(
        &s.cash,
        &MovementParams::default(),
        postings,
    );

    assert_eq!(report.movements.len(), 2);
    assert_eq!(report.movements[0].occurred_at, day(5));
    assert_eq!(report.movements[0].running_balance, dec!(100.00));
    assert_eq!(report.movements[1].running_balance, dec!(70.00));
    assert_eq!(report.final_balance, dec!(70.00));
}

#[test]
fn test_movements_of_income_account_use_debit_plus() {
    let s = SaleScenario::new();
    let report = ReportService::generate_account_movements(
        &s.revenue,
        &MovementParams::default(),
        s.postings.clone(),
    );
    assert_eq!(report.final_balance, dec!(-100.00));
}

#[test]
fn test_movements_skip_deleted_entries_and_window() {
    let s = SaleScenario::new();
    let mut voided = posting(&s.cash, EntryId::new(), dec!(999), Side::Debit, day(6));
    voided.entry_lifecycle = Lifecycle::Deleted(day(7));
    let mut postings = s.postings.clone();
    postings.push(voided);
    postings.push(posting(&s.cash, EntryId::new(), dec!(1), Side::Debit, day(20)));

    let params = MovementParams::parse(None, Some("2024-01-10")).unwrap();
    let report = ReportService::generate_account_movements(&s.cash, &params, postings);

    assert_eq!(report.movements.len(), 1);
    assert_eq!(report.final_balance, dec!(100.00));
    assert_eq!(report.end, Some(day(10)));
}

#[test]
fn test_movements_empty_account() {
    let s = SaleScenario::new();
    let report =
        ReportService::generate_account_movements(&s.cash, &MovementParams::default(), vec![]);
    assert!(report.movements.is_empty());
    assert_eq!(report.final_balance, Decimal::ZERO);
}

#[test]
fn test_movements_tie_break_on_creation_then_line() {
    let s = SaleScenario::new();
    let same_day = day(5);
    let mut first = posting(&s.cash, EntryId::new(), dec!(10), Side::Debit, same_day);
    first.entry_created_at = same_day;
    let mut second = posting(&s.cash, EntryId::new(), dec!(20), Side::Credit, same_day);
    second.entry_created_at = same_day + Duration::seconds(1);

    let report = ReportService::generate_account_movements(
        &s.cash,
        &MovementParams::default(),
        vec![second.clone(), first.clone()],
    );
    assert_eq!(report.movements[0].line_id, first.line_id);
    assert_eq!(report.movements[1].line_id, second.line_id);
    assert_eq!(report.final_balance, dec!(-10));
}

#[test]
fn test_account_balance_report() {
    let totals = AccountTotals {
        account_id: AccountId::new(),
        debits: dec!(100),
        credits: dec!(40),
        posting_count: 2,
    };
    let report = ReportService::account_balance(&totals, Some(day(6)));
    assert_eq!(report.net(), dec!(60));
    assert_eq!(report.as_of, Some(day(6)));
}

#[test]
fn test_zero_amounts_serialize_with_two_digits() {
    let s = SaleScenario::new();

    let params = BalanceSheetParams::parse(Some("2024-01-02"), Utc::now()).unwrap();
    let sheet = ReportService::generate_balance_sheet(
        &params,
        s.aggregate(Statement::BalanceSheet, params.window()),
    );
    let json = serde_json::to_value(&sheet).unwrap();
    let idle = &json["assets"][0];
    assert_eq!(idle["total_debit"], "0.00");
    assert_eq!(idle["total_credit"], "0.00");
    assert_eq!(idle["balance"], "0.00");
    assert_eq!(json["totals"]["total_assets"], "0.00");
    assert_eq!(json["totals"]["total_liabilities"], "0.00");
    assert_eq!(json["totals"]["total_equity"], "0.00");
    assert_eq!(json["totals"]["calculated_equity"], "0.00");

    let params = IncomeStatementParams::parse("2024-02-01", "2024-02-29").unwrap();
    let income = ReportService::generate_income_statement(
        &params,
        s.aggregate(Statement::IncomeStatement, params.window()),
    );
    let json = serde_json::to_value(&income).unwrap();
    assert_eq!(json["totals"]["total_income"], "0.00");
    assert_eq!(json["totals"]["total_expenses"], "0.00");
    assert_eq!(json["totals"]["net_income"], "0.00");

    let movements =
        ReportService::generate_account_movements(&s.cash, &MovementParams::default(), vec![]);
    assert_eq!(serde_json::to_value(&movements).unwrap()["final_balance"], "0.00");
}

/// Strategy for `(cents, is_debit, day offset)` triples.
fn posting_strategy() -> impl Strategy<Value = (i64, bool, i64)> {
    (1i64..100_000i64, any::<bool>(), 0i64..90)
}

proptest! {
    /// Property: balance sheet calculated equity is assets minus liabilities,
    /// and section totals equal the sum of their rows.
    #[test]
    fn prop_balance_sheet_totals(
        rows in prop::collection::vec((0usize..3, 0i64..1_000_000, 0i64..1_000_000), 0..20),
    ) {
        let owner = OwnerId::new();
        let kinds = [AccountKind::Asset, AccountKind::Liability, AccountKind::Equity];
        let aggregates: Vec<AccountAggregate> = rows
            .iter()
            .enumerate()
            .map(|(i, (k, d, c))| {
                let acc = account(owner, &format!("A{i}"), kinds[*k]);
                aggregate(&acc, Decimal::new(*d, 2), Decimal::new(*c, 2))
            })
            .collect();
        let params = BalanceSheetParams::parse(None, day(1)).unwrap();
        let report = ReportService::generate_balance_sheet(&params, aggregates);

        let sum = |rows: &[super::types::StatementLine]| -> Decimal {
            rows.iter().map(|r| r.balance).sum()
        };
        prop_assert_eq!(report.totals.total_assets, sum(&report.assets));
        prop_assert_eq!(report.totals.total_liabilities, sum(&report.liabilities));
        prop_assert_eq!(report.totals.total_equity, sum(&report.equity));
        prop_assert_eq!(
            report.totals.calculated_equity,
            report.totals.total_assets - report.totals.total_liabilities
        );
        prop_assert_eq!(
            report.assets.len() + report.liabilities.len() + report.equity.len(),
            rows.len()
        );
    }

    /// Property: the movements final balance equals debits minus credits of
    /// the same window, whatever order the postings arrive in.
    #[test]
    fn prop_movements_final_balance_matches_totals(
        specs in prop::collection::vec(posting_strategy(), 0..40),
        reverse in any::<bool>(),
    ) {
        let owner = OwnerId::new();
        let cash = account(owner, "Cash", AccountKind::Asset);
        let mut postings: Vec<Posting> = specs
            .iter()
            .map(|(cents, is_debit, offset)| {
                let side = if *is_debit { Side::Debit } else { Side::Credit };
                let at = day(1) + Duration::days(*offset);
                posting(&cash, EntryId::new(), Decimal::new(*cents, 2), side, at)
            })
            .collect();
        if reverse {
            postings.reverse();
        }

        let params = MovementParams::parse(Some("2024-01-15"), Some("2024-03-01")).unwrap();
        let totals = BalanceAggregator::totals_for(cash.id, params.window, &postings);
        let report = ReportService::generate_account_movements(&cash, &params, postings);

        prop_assert_eq!(report.final_balance, totals.debits - totals.credits);
        prop_assert_eq!(report.movements.len(), totals.posting_count);
        for pair in report.movements.windows(2) {
            prop_assert!(pair[0].occurred_at <= pair[1].occurred_at);
        }
    }
}
