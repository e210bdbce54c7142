//! Ledger service for entry validation.
//!
//! This module provides the core business logic for validating a balanced
//! entry before it is persisted. Lookups are passed in as closures so the
//! repository can resolve them inside its own database transaction.

use tally_shared::types::{AccountId, Amount, OwnerId};

use super::error::LedgerError;
use super::types::{
    AccountRecord, CreateEntryInput, EntryTotals, LineRecord, NewLineInput, ValidatedEntry,
    ValidatedLine,
};

/// Minimum number of lines in an entry.
pub const MIN_LINES: usize = 2;

/// Ledger service for entry validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validate an entry and its full line set before persisting.
    ///
    /// Checks run in this order and stop at the first failure:
    /// 1. The owner exists
    /// 2. At least two lines
    /// 3. Every line posts to an active account of the same owner with a
    ///    positive, 2-digit amount
    /// 4. Debits equal credits exactly
    ///
    /// # Arguments
    ///
    /// * `input` - The entry to validate
    /// * `owner_exists` - Returns true if the owner exists
    /// * `account_lookup` - Returns the account record, if any
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails.
    pub fn validate_entry<O, A>(
        input: &CreateEntryInput,
        owner_exists: O,
        account_lookup: A,
    ) -> Result<ValidatedEntry, LedgerError>
    where
        O: Fn(OwnerId) -> bool,
        A: Fn(AccountId) -> Option<AccountRecord>,
    {
        // 1. Owner
        if !owner_exists(input.owner_id) {
            return Err(LedgerError::OwnerNotFound(input.owner_id));
        }

        // 2. Line count
        if input.lines.len() < MIN_LINES {
            return Err(LedgerError::InsufficientLines(input.lines.len()));
        }

        // 3. Each line
        let lines = input
            .lines
            .iter()
            .map(|line| Self::validate_line(line, input.owner_id, &account_lookup))
            .collect::<Result<Vec<_>, _>>()?;

        // 4. Balance
        let totals = Self::calculate_totals(&lines);
        if !totals.is_balanced {
            return Err(LedgerError::Unbalanced {
                debit: totals.debit,
                credit: totals.credit,
            });
        }

        Ok(ValidatedEntry {
            owner_id: input.owner_id,
            occurred_at: input.occurred_at,
            description: input.description.clone(),
            lines,
            totals,
        })
    }

    fn validate_line<A>(
        line: &NewLineInput,
        owner_id: OwnerId,
        account_lookup: &A,
    ) -> Result<ValidatedLine, LedgerError>
    where
        A: Fn(AccountId) -> Option<AccountRecord>,
    {
        let usable = account_lookup(line.account_id).is_some_and(|a| a.is_usable_by(owner_id));
        if !usable {
            return Err(LedgerError::UnknownOrForeignAccount(line.account_id));
        }

        let amount = Amount::new(line.amount)?;

        Ok(ValidatedLine {
            account_id: line.account_id,
            amount,
            side: line.side,
        })
    }

    /// Calculate totals of validated lines.
    #[must_use]
    pub fn calculate_totals(lines: &[ValidatedLine]) -> EntryTotals {
        EntryTotals::from_postings(lines.iter().map(|l| (l.side, l.amount)))
    }

    /// Check that a persisted line set balances.
    ///
    /// # Errors
    ///
    /// Returns `Unbalanced` with the computed totals if it does not.
    pub fn ensure_balanced(lines: &[LineRecord]) -> Result<EntryTotals, LedgerError> {
        let totals = EntryTotals::from_postings(lines.iter().map(|l| (l.side, l.amount)));
        if totals.is_balanced {
            Ok(totals)
        } else {
            Err(LedgerError::Unbalanced {
                debit: totals.debit,
                credit: totals.credit,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{AccountKind, Lifecycle, Side};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct Fixture {
        owner: OwnerId,
        accounts: HashMap<AccountId, AccountRecord>,
        cash: AccountId,
        revenue: AccountId,
    }

    impl Fixture {
        fn new() -> Self {
            let owner = OwnerId::new();
            let mut accounts = HashMap::new();
            let cash = Self::insert(&mut accounts, owner, "Cash", AccountKind::Asset);
            let revenue = Self::insert(&mut accounts, owner, "Revenue", AccountKind::Income);
            Self {
                owner,
                accounts,
                cash,
                revenue,
            }
        }

        fn insert(
            accounts: &mut HashMap<AccountId, AccountRecord>,
            owner: OwnerId,
            name: &str,
            kind: AccountKind,
        ) -> AccountId {
            let now = Utc::now();
            let id = AccountId::new();
            accounts.insert(
                id,
                AccountRecord {
                    id,
                    owner_id: owner,
                    name: name.to_string(),
                    kind,
                    suffix: None,
                    created_at: now,
                    updated_at: now,
                    lifecycle: Lifecycle::Active,
                },
            );
            id
        }

        fn input(&self, lines: Vec<NewLineInput>) -> CreateEntryInput {
            CreateEntryInput {
                owner_id: self.owner,
                occurred_at: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
                description: Some("Sale".to_string()),
                lines,
            }
        }

        fn validate(&self, input: &CreateEntryInput) -> Result<ValidatedEntry, LedgerError> {
            LedgerService::validate_entry(
                input,
                |id| id == self.owner,
                |id| self.accounts.get(&id).cloned(),
            )
        }
    }

    fn line(account_id: AccountId, amount: Decimal, side: Side) -> NewLineInput {
        NewLineInput {
            account_id,
            amount,
            side,
        }
    }

    #[test]
    fn test_validate_balanced_entry() {
        let f = Fixture::new();
        let input = f.input(vec![
            line(f.cash, dec!(100.00), Side::Debit),
            line(f.revenue, dec!(100.00), Side::Credit),
        ]);

        let entry = f.validate(&input).unwrap();
        assert_eq!(entry.lines.len(), 2);
        assert!(entry.totals.is_balanced);
        assert_eq!(entry.totals.debit, dec!(100.00));
        assert_eq!(entry.totals.credit, dec!(100.00));
        assert_eq!(entry.description.as_deref(), Some("Sale"));
    }

    #[test]
    fn test_validate_unbalanced_entry() {
        let f = Fixture::new();
        let input = f.input(vec![
            line(f.cash, dec!(50.00), Side::Debit),
            line(f.revenue, dec!(40.00), Side::Credit),
        ]);

        match f.validate(&input) {
            Err(LedgerError::Unbalanced { debit, credit }) => {
                assert_eq!(debit, dec!(50.00));
                assert_eq!(credit, dec!(40.00));
            }
            other => panic!("expected Unbalanced, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_insufficient_lines() {
        let f = Fixture::new();
        let input = f.input(vec![]);
        assert!(matches!(
            f.validate(&input),
            Err(LedgerError::InsufficientLines(0))
        ));

        // A single line fails on count even though it cannot balance.
        let input = f.input(vec![line(f.cash, dec!(10), Side::Debit)]);
        assert!(matches!(
            f.validate(&input),
            Err(LedgerError::InsufficientLines(1))
        ));
    }

    #[test]
    fn test_owner_checked_first() {
        let f = Fixture::new();
        let mut input = f.input(vec![]);
        input.owner_id = OwnerId::new();
        assert!(matches!(
            f.validate(&input),
            Err(LedgerError::OwnerNotFound(_))
        ));
    }

    #[test]
    fn test_unknown_account() {
        let f = Fixture::new();
        let stranger = AccountId::new();
        let input = f.input(vec![
            line(f.cash, dec!(10), Side::Debit),
            line(stranger, dec!(10), Side::Credit),
        ]);
        assert!(matches!(
            f.validate(&input),
            Err(LedgerError::UnknownOrForeignAccount(id)) if id == stranger
        ));
    }

    #[test]
    fn test_foreign_account() {
        let mut f = Fixture::new();
        let foreign = Fixture::insert(
            &mut f.accounts,
            OwnerId::new(),
            "Other Cash",
            AccountKind::Asset,
        );
        let input = f.input(vec![
            line(foreign, dec!(10), Side::Debit),
            line(f.revenue, dec!(10), Side::Credit),
        ]);
        assert!(matches!(
            f.validate(&input),
            Err(LedgerError::UnknownOrForeignAccount(id)) if id == foreign
        ));
    }

    #[test]
    fn test_deleted_account() {
        let mut f = Fixture::new();
        if let Some(acc) = f.accounts.get_mut(&f.cash) {
            acc.lifecycle = Lifecycle::Deleted(Utc::now());
        }
        let input = f.input(vec![
            line(f.cash, dec!(10), Side::Debit),
            line(f.revenue, dec!(10), Side::Credit),
        ]);
        assert!(matches!(
            f.validate(&input),
            Err(LedgerError::UnknownOrForeignAccount(_))
        ));
    }

    #[test]
    fn test_invalid_amounts() {
        let f = Fixture::new();
        for bad in [dec!(0), dec!(-5), dec!(1.234)] {
            let input = f.input(vec![
                line(f.cash, bad, Side::Debit),
                line(f.revenue, dec!(10), Side::Credit),
            ]);
            assert!(matches!(
                f.validate(&input),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_ensure_balanced() {
        let entry_id = tally_shared::types::EntryId::new();
        let make = |amount: Decimal, side| LineRecord {
            id: tally_shared::types::LineId::new(),
            entry_id,
            account_id: AccountId::new(),
            amount: Amount::new(amount).unwrap(),
            side,
        };
        assert!(
            LedgerService::ensure_balanced(&[
                make(dec!(5), Side::Debit),
                make(dec!(5), Side::Credit)
            ])
            .is_ok()
        );
        assert!(matches!(
            LedgerService::ensure_balanced(&[make(dec!(5), Side::Debit)]),
            Err(LedgerError::Unbalanced { .. })
        ));
    }
}
