//! Core library for transaction extraction from bank messages.
//!
//! This crate provides:
//! - A cascade of pattern tiers for SMS alerts, UPI notifications and statement lines
//! - Amount, date, direction, balance and counterparty normalization
//! - Keyword-based category classification with replaceable tables
//! - Single-best and multi-match extraction modes

pub mod error;
pub mod extract;
pub mod models;

pub use error::{CategoryError, Result, TxtractError};
pub use extract::{
    CategoryClassifier, CategoryEntry, ExtractionReport, TransactionEngine, TransactionExtractor,
};
pub use extract::rules::{normalize_date, NormalizedDate};
pub use models::config::{ExtractionMode, OutputFormat, TxtractConfig};
pub use models::transaction::{
    Category, DateResolution, PatternKind, TransactionCandidate, TransactionType,
};
