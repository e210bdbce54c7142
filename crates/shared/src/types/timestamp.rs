//! Strict ISO-8601 timestamp parsing and inclusive date windows.
//!
//! Accepted forms:
//! - RFC 3339 with offset or `Z` (`2024-01-05T10:00:00+02:00`)
//! - naive date-time, read as UTC (`2024-01-05T10:00:00`, optional fraction)
//! - date only, read as midnight UTC (`2024-01-05`)

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by timestamp parsing and window construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Text is not an ISO-8601 timestamp.
    #[error("invalid date '{0}', expected ISO-8601 (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS[+HH:MM])")]
    Invalid(String),

    /// Window start is after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvertedRange {
        /// Window start.
        start: DateTime<Utc>,
        /// Window end.
        end: DateTime<Utc>,
    },
}

/// Parses an ISO-8601 timestamp into UTC.
///
/// # Errors
///
/// Returns [`TimestampError::Invalid`] for anything outside the accepted forms.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(TimestampError::Invalid(input.to_string()))
}

/// Parses an optional timestamp, passing `None` through.
///
/// # Errors
///
/// Returns [`TimestampError::Invalid`] if the value is present but malformed.
pub fn parse_optional_timestamp(
    input: Option<&str>,
) -> Result<Option<DateTime<Utc>>, TimestampError> {
    input.map(parse_timestamp).transpose()
}

/// An inclusive window over entry occurrence timestamps. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Builds a window, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::InvertedRange`] when both bounds are set and inverted.
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, TimestampError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(TimestampError::InvertedRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// A window with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Everything up to and including `as_of`.
    #[must_use]
    pub const fn until(as_of: DateTime<Utc>) -> Self {
        Self {
            start: None,
            end: Some(as_of),
        }
    }

    /// Lower bound, if any.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Upper bound, if any.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns true if `at` falls inside the window (bounds inclusive).
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}
