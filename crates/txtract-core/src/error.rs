//! Error types for the txtract-core library.
//!
//! Extraction itself never fails: a text with no recognizable transaction
//! yields an empty result. These errors cover the surrounding configuration
//! and category-table loading.

use thiserror::Error;

/// Main error type for the txtract library.
#[derive(Error, Debug)]
pub enum TxtractError {
    /// Category table error.
    #[error("category table error: {0}")]
    Category(#[from] CategoryError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while building a category keyword table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CategoryError {
    /// The category name is not one of the closed set.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// A keyword is empty or whitespace only; it would match every description.
    #[error("empty keyword in category {0}")]
    EmptyKeyword(String),

    /// The same category appears twice, making its priority ambiguous.
    #[error("duplicate category: {0}")]
    Duplicate(String),
}

/// Result type for the txtract library.
pub type Result<T> = std::result::Result<T, TxtractError>;
