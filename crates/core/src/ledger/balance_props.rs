//! Property-based tests for balance aggregation and running balances.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, Amount, DateWindow, EntryId, LineId, OwnerId};

use super::balance::{BalanceAggregator, BalanceQuery, Posting, RunningBalance, SignConvention};
use super::types::{AccountKind, AccountRecord, Lifecycle, Side};

/// Strategy for generating balance changes (can be positive or negative).
fn balance_change_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for `(cents, is_debit, day offset, entry deleted)` postings.
fn posting_strategy() -> impl Strategy<Value = (i64, bool, i64, bool)> {
    (1i64..1_000_000i64, any::<bool>(), 0i64..60, prop::bool::weighted(0.2))
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn make_posting(account_id: AccountId, shape: (i64, bool, i64, bool)) -> Posting {
    let (cents, is_debit, day, deleted) = shape;
    let occurred_at = base() + Duration::days(day);
    Posting {
        line_id: LineId::new(),
        entry_id: EntryId::new(),
        account_id,
        amount: Amount::from_minor_units(cents).unwrap(),
        side: if is_debit { Side::Debit } else { Side::Credit },
        occurred_at,
        entry_created_at: occurred_at,
        description: None,
        entry_lifecycle: if deleted {
            Lifecycle::Deleted(occurred_at)
        } else {
            Lifecycle::Active
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: current balance equals previous plus change.
    #[test]
    fn prop_current_equals_previous_plus_change(
        changes in prop::collection::vec(balance_change_strategy(), 1..30),
    ) {
        let chain = RunningBalance::chain(changes.iter().copied());
        for (rb, change) in chain.iter().zip(&changes) {
            prop_assert_eq!(rb.current_balance, rb.previous_balance + *change);
        }
    }

    /// Property: each previous balance equals the prior current balance,
    /// and the terminal value is the sum of all changes.
    #[test]
    fn prop_running_chain_consistent(
        changes in prop::collection::vec(balance_change_strategy(), 1..30),
    ) {
        let chain = RunningBalance::chain(changes.iter().copied());
        prop_assert_eq!(chain[0].previous_balance, Decimal::ZERO);
        for pair in chain.windows(2) {
            prop_assert_eq!(pair[1].previous_balance, pair[0].current_balance);
            prop_assert_eq!(pair[1].sequence, pair[0].sequence + 1);
        }
        let total: Decimal = changes.iter().copied().sum();
        prop_assert_eq!(chain.last().map(|r| r.current_balance), Some(total));
    }

    /// Property: aggregated totals equal a direct filter-and-sum over active
    /// postings in the window.
    #[test]
    fn prop_aggregate_matches_direct_sum(
        specs in prop::collection::vec(posting_strategy(), 0..40),
        start in 0i64..30,
        len in 0i64..30,
    ) {
        let owner = OwnerId::new();
        let now = base();
        let account = AccountRecord {
            id: AccountId::new(),
            owner_id: owner,
            name: "Cash".to_string(),
            kind: AccountKind::Asset,
            suffix: None,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        };
        let postings: Vec<Posting> =
            specs.iter().map(|s| make_posting(account.id, *s)).collect();

        let window = DateWindow::new(
            Some(base() + Duration::days(start)),
            Some(base() + Duration::days(start + len)),
        )
        .unwrap();
        let result = BalanceAggregator::aggregate(
            &BalanceQuery::for_owner(owner).within(window),
            std::slice::from_ref(&account),
            &postings,
        );

        let counted: Vec<&Posting> = postings
            .iter()
            .filter(|p| p.entry_lifecycle.is_active() && window.contains(p.occurred_at))
            .collect();
        let debits: Decimal = counted
            .iter()
            .filter(|p| p.side == Side::Debit)
            .map(|p| p.amount.value())
            .sum();
        let credits: Decimal = counted
            .iter()
            .filter(|p| p.side == Side::Credit)
            .map(|p| p.amount.value())
            .sum();

        prop_assert_eq!(result.len(), 1);
        prop_assert_eq!(result[0].totals.debits, debits);
        prop_assert_eq!(result[0].totals.credits, credits);
        prop_assert_eq!(result[0].totals.posting_count, counted.len());

        // Single-account totals agree with the aggregator.
        let single = BalanceAggregator::totals_for(account.id, window, &postings);
        prop_assert_eq!(single, result[0].totals);

        // Running balance over signed postings ends at debits - credits.
        let chain = RunningBalance::chain(counted.iter().map(|p| p.side.signed(p.amount)));
        let terminal = chain.last().map_or(Decimal::ZERO, |r| r.current_balance);
        prop_assert_eq!(terminal, result[0].totals.balance(SignConvention::DebitNormal));
    }
}
