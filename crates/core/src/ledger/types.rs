//! Domain types for the ledger.
//!
//! Records mirror what is persisted; inputs are what callers hand to the
//! entry builder and line mutator before validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, Amount, EntryId, LineId, OwnerId, ZERO_AMOUNT};

/// Classification of an account, driving sign conventions in statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Revenue earned.
    Income,
    /// Costs incurred.
    Expense,
}

impl AccountKind {
    /// All kinds, in statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown account kind or side code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what} '{value}'")]
pub struct ParseCodeError {
    what: &'static str,
    value: String,
}

impl FromStr for AccountKind {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseCodeError {
                what: "account kind",
                value: s.to_string(),
            })
    }
}

/// Side of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Debit, coded `D`.
    #[serde(rename = "D")]
    Debit,
    /// Credit, coded `C`.
    #[serde(rename = "C")]
    Credit,
}

impl Side {
    /// Single-letter code as stored.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Debit => "D",
            Self::Credit => "C",
        }
    }

    /// Signed contribution of `amount` to a debit-minus-credit balance.
    #[must_use]
    pub fn signed(self, amount: Amount) -> Decimal {
        match self {
            Self::Debit => amount.value(),
            Self::Credit => -amount.value(),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Side {
    type Err = ParseCodeError;

    /// Only the exact codes `D` and `C` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" => Ok(Self::Debit),
            "C" => Ok(Self::Credit),
            other => Err(ParseCodeError {
                what: "side",
                value: other.to_string(),
            }),
        }
    }
}

/// Soft-delete state of an account or entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "at", rename_all = "lowercase")]
pub enum Lifecycle {
    /// Visible to every operation.
    Active,
    /// Soft-deleted at the given instant. Terminal.
    Deleted(DateTime<Utc>),
}

impl Lifecycle {
    /// Builds the state from a nullable `deleted_at` column.
    #[must_use]
    pub const fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Self::Deleted(at),
            None => Self::Active,
        }
    }

    /// The single liveness predicate used across the ledger.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Deletion instant, if soft-deleted.
    #[must_use]
    pub const fn deleted_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted(at) => Some(at),
        }
    }
}

/// A ledger owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    /// Owner ID.
    pub id: OwnerId,
    /// Unique email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Whether the owner is active.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// An account as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Account ID.
    pub id: AccountId,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Display name, unique per owner among active accounts.
    pub name: String,
    /// Account kind.
    pub kind: AccountKind,
    /// Optional 4-character suffix (e.g. last digits of a card).
    pub suffix: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete state.
    pub lifecycle: Lifecycle,
}

impl AccountRecord {
    /// Returns true if the account is usable by `owner_id`.
    #[must_use]
    pub fn is_usable_by(&self, owner_id: OwnerId) -> bool {
        self.lifecycle.is_active() && self.owner_id == owner_id
    }
}

/// An entry header as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Entry ID.
    pub id: EntryId,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Business date of the event.
    pub occurred_at: DateTime<Utc>,
    /// Free-text description.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Soft-delete state.
    pub lifecycle: Lifecycle,
}

/// A line as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Line ID.
    pub id: LineId,
    /// Owning entry.
    pub entry_id: EntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Positive amount.
    pub amount: Amount,
    /// Debit or credit.
    pub side: Side,
}

/// An entry together with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: EntryRecord,
    /// Lines, in insertion order.
    pub lines: Vec<LineRecord>,
}

/// Input line for a new entry. The amount is validated by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineInput {
    /// Account to post to.
    pub account_id: AccountId,
    /// Raw amount.
    pub amount: Decimal,
    /// Debit or credit.
    pub side: Side,
}

/// Input for creating a balanced entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryInput {
    /// Owning user.
    pub owner_id: OwnerId,
    /// Business date of the event.
    pub occurred_at: DateTime<Utc>,
    /// Free-text description.
    pub description: Option<String>,
    /// Lines of the entry.
    pub lines: Vec<NewLineInput>,
}

/// A line that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedLine {
    /// Account to post to.
    pub account_id: AccountId,
    /// Validated amount.
    pub amount: Amount,
    /// Debit or credit.
    pub side: Side,
}

/// Debit and credit totals of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Sums `(side, amount)` pairs.
    pub fn from_postings(postings: impl IntoIterator<Item = (Side, Amount)>) -> Self {
        let (debit, credit) = postings.into_iter().fold(
            (ZERO_AMOUNT, ZERO_AMOUNT),
            |(debit, credit), (side, amount)| match side {
                Side::Debit => (debit + amount.value(), credit),
                Side::Credit => (debit, credit + amount.value()),
            },
        );
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }
}

/// An entry ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedEntry {
    /// Owning user.
    pub owner_id: OwnerId,
    /// Business date of the event.
    pub occurred_at: DateTime<Utc>,
    /// Free-text description.
    pub description: Option<String>,
    /// Validated lines.
    pub lines: Vec<ValidatedLine>,
    /// Totals, always balanced.
    pub totals: EntryTotals,
}

/// Partial update of an account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountChanges {
    /// New display name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<AccountKind>,
    /// New suffix.
    pub suffix: Option<String>,
}

/// Partial update of an entry header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryChanges {
    /// New business date.
    pub occurred_at: Option<DateTime<Utc>>,
    /// New description.
    pub description: Option<String>,
}

/// Partial update of a line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChanges {
    /// New account.
    pub account_id: Option<AccountId>,
    /// New raw amount.
    pub amount: Option<Decimal>,
    /// New side.
    pub side: Option<Side>,
}

impl LineChanges {
    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.account_id.is_none() && self.amount.is_none() && self.side.is_none()
    }
}
