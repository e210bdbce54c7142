//! Core ledger logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry bookkeeping rules and balance aggregation
//! - `reports` - Balance sheet, income statement and account movements

pub mod ledger;
pub mod reports;
