//! Common types used across the application.

pub mod id;
pub mod money;
pub mod timestamp;

pub use id::*;
pub use money::{AMOUNT_SCALE, Amount, AmountError, ZERO_AMOUNT};
pub use timestamp::{DateWindow, TimestampError, parse_optional_timestamp, parse_timestamp};
