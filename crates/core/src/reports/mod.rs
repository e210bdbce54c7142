//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Balance Sheet
//! - Income Statement
//! - Account Movements
//! - Single-account balance

pub mod error;
pub mod params;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use params::{BalanceSheetParams, IncomeStatementParams, MovementParams};
pub use service::ReportService;
pub use types::*;
