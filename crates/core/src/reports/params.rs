//! Report parameters parsed from caller-supplied ISO-8601 strings.
//!
//! Parsing happens before any query runs, so a malformed date never reaches
//! the store.

use chrono::{DateTime, Utc};
use tally_shared::types::{DateWindow, parse_optional_timestamp, parse_timestamp};

use super::error::ReportError;

/// Parameters of a balance sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSheetParams {
    /// Inclusive cut-off.
    pub as_of: DateTime<Utc>,
}

impl BalanceSheetParams {
    /// Parses `as_of`, defaulting to `now` when absent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` if `as_of` is present but malformed.
    pub fn parse(as_of: Option<&str>, now: DateTime<Utc>) -> Result<Self, ReportError> {
        Ok(Self {
            as_of: parse_optional_timestamp(as_of)?.unwrap_or(now),
        })
    }

    /// Window covering everything up to `as_of`.
    #[must_use]
    pub const fn window(&self) -> DateWindow {
        DateWindow::until(self.as_of)
    }
}

/// Parameters of an income statement. Both bounds are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeStatementParams {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window: DateWindow,
}

impl IncomeStatementParams {
    /// Builds parameters from parsed bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ReportError> {
        let window = DateWindow::new(Some(start), Some(end))?;
        Ok(Self { start, end, window })
    }

    /// Parses both bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` for a malformed bound or `InvalidDateRange` if
    /// `start > end`.
    pub fn parse(start: &str, end: &str) -> Result<Self, ReportError> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    /// Period start (inclusive).
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Period end (inclusive).
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The period as a window.
    #[must_use]
    pub const fn window(&self) -> DateWindow {
        self.window
    }
}

/// Parameters of an account movements report. Bounds are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementParams {
    /// Window over entry occurrence.
    pub window: DateWindow,
}

impl MovementParams {
    /// Parses optional bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDate` for a malformed bound or `InvalidDateRange` if
    /// both are set and inverted.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ReportError> {
        let window = DateWindow::new(
            parse_optional_timestamp(start)?,
            parse_optional_timestamp(end)?,
        )?;
        Ok(Self { window })
    }
}
