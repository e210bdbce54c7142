//! Property-based tests for the entry builder.
//!
//! - Balanced line sets with at least two lines are accepted
//! - Any imbalance is rejected with the computed totals
//! - Fewer than two lines is rejected regardless of balance

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, OwnerId};

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{
    AccountKind, AccountRecord, CreateEntryInput, Lifecycle, NewLineInput, Side, ValidatedEntry,
};

/// Strategy to generate positive 2-digit amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Debit), Just(Side::Credit)]
}

struct Book {
    owner: OwnerId,
    accounts: HashMap<AccountId, AccountRecord>,
    ids: Vec<AccountId>,
}

impl Book {
    fn new(count: usize) -> Self {
        let owner = OwnerId::new();
        let now = Utc::now();
        let mut accounts = HashMap::new();
        let mut ids = Vec::with_capacity(count);
        for i in 0..count {
            let id = AccountId::new();
            accounts.insert(
                id,
                AccountRecord {
                    id,
                    owner_id: owner,
                    name: format!("Account {i}"),
                    kind: AccountKind::ALL[i % AccountKind::ALL.len()],
                    suffix: None,
                    created_at: now,
                    updated_at: now,
                    lifecycle: Lifecycle::Active,
                },
            );
            ids.push(id);
        }
        Self {
            owner,
            accounts,
            ids,
        }
    }

    fn line(&self, i: usize, amount: Decimal, side: Side) -> NewLineInput {
        NewLineInput {
            account_id: self.ids[i % self.ids.len()],
            amount,
            side,
        }
    }

    fn validate(&self, lines: Vec<NewLineInput>) -> Result<ValidatedEntry, LedgerError> {
        let input = CreateEntryInput {
            owner_id: self.owner,
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            description: None,
            lines,
        };
        LedgerService::validate_entry(
            &input,
            |id| id == self.owner,
            |id| self.accounts.get(&id).cloned(),
        )
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: splitting one credit across several debits balances.
    ///
    /// *For any* set of debit amounts offset by a single credit of their sum,
    /// validation SHALL succeed with equal totals.
    #[test]
    fn prop_balanced_entry_accepted(
        debits in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let book = Book::new(4);
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<NewLineInput> = debits
            .iter()
            .enumerate()
            .map(|(i, amount)| book.line(i, *amount, Side::Debit))
            .collect();
        lines.push(book.line(3, total, Side::Credit));

        let entry = book.validate(lines);
        prop_assert!(entry.is_ok(), "balanced entry should be accepted");
        let entry = entry.unwrap();
        prop_assert!(entry.totals.is_balanced);
        prop_assert_eq!(entry.totals.debit, total);
        prop_assert_eq!(entry.totals.credit, total);
    }

    /// Property: any imbalance is rejected with the computed totals.
    #[test]
    fn prop_unbalanced_entry_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let book = Book::new(2);
        let result = book.validate(vec![
            book.line(0, debit, Side::Debit),
            book.line(1, credit, Side::Credit),
        ]);

        match result {
            Err(LedgerError::Unbalanced { debit: d, credit: c }) => {
                prop_assert_eq!(d, debit);
                prop_assert_eq!(c, credit);
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    /// Property: zero or one line fails on count, whatever its content.
    #[test]
    fn prop_too_few_lines_rejected(
        lines in prop::collection::vec((positive_amount(), side_strategy()), 0..2),
    ) {
        let book = Book::new(1);
        let count = lines.len();
        let lines = lines
            .into_iter()
            .map(|(amount, side)| book.line(0, amount, side))
            .collect();

        prop_assert!(matches!(
            book.validate(lines),
            Err(LedgerError::InsufficientLines(n)) if n == count
        ));
    }

    /// Property: a sub-cent amount is never accepted.
    #[test]
    fn prop_sub_cent_amount_rejected(
        mills in 1i64..1_000_000i64,
    ) {
        prop_assume!(mills % 10 != 0);
        let book = Book::new(2);
        let amount = Decimal::new(mills, 3);
        let result = book.validate(vec![
            book.line(0, amount, Side::Debit),
            book.line(1, amount, Side::Credit),
        ]);
        prop_assert!(matches!(result, Err(LedgerError::InvalidAmount(_))));
    }
}
