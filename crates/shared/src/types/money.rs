//! Fixed-point posting amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! `Amount` wraps `rust_decimal::Decimal` and is always stored at scale 2,
//! so sums and comparisons of amounts are exact.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fraction digits carried by every amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Zero carried at [`AMOUNT_SCALE`], so empty totals still render as `0.00`.
pub const ZERO_AMOUNT: Decimal = Decimal::from_parts(0, 0, 0, false, AMOUNT_SCALE);

/// Errors raised when constructing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amount is zero or negative.
    #[error("amount must be greater than zero, got {0}")]
    NotPositive(Decimal),

    /// Amount has more than two fraction digits.
    #[error("amount must have at most 2 decimal places, got {0}")]
    TooPrecise(Decimal),

    /// Amount does not fit the persisted minor-unit range.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),

    /// Text is not a decimal number.
    #[error("'{0}' is not a valid decimal amount")]
    Unparseable(String),
}

/// A strictly positive monetary amount with exactly two fraction digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount, rejecting non-positive or over-precise values.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not positive, has more than two
    /// fraction digits, or does not fit in `i64` minor units.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }
        if value.normalize().scale() > AMOUNT_SCALE {
            return Err(AmountError::TooPrecise(value));
        }

        let mut scaled = value;
        scaled.rescale(AMOUNT_SCALE);
        if i64::try_from(scaled.mantissa()).is_err() {
            return Err(AmountError::OutOfRange(value));
        }

        Ok(Self(scaled))
    }

    /// Creates an amount from integer minor units (cents).
    ///
    /// # Errors
    ///
    /// Returns an error if `minor` is not positive.
    pub fn from_minor_units(minor: i64) -> Result<Self, AmountError> {
        Self::new(Decimal::new(minor, AMOUNT_SCALE))
    }

    /// Returns the amount in integer minor units (cents).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_minor_units(self) -> i64 {
        // Range is checked in `new`.
        self.0.mantissa() as i64
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            Decimal::from_str(s.trim()).map_err(|_| AmountError::Unparseable(s.to_string()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
