//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point `Amount` type with exact two-digit precision
//! - Typed IDs for type-safe entity references
//! - Strict ISO-8601 timestamp parsing
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LineMutationPolicy};
pub use error::{AppError, AppResult, ErrorKind};
