//! Configuration structures for the extraction engine and its front ends.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TxtractError};
use crate::extract::{CategoryClassifier, TransactionEngine};

/// Main configuration for txtract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TxtractConfig {
    /// Engine behaviour.
    pub extraction: ExtractionConfig,

    /// Category table source.
    pub categories: CategoryConfig,

    /// Output rendering.
    pub output: OutputConfig,
}

/// How many records a call may return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// The first successful match in cascade order.
    Single,
    /// Every non-overlapping match.
    #[default]
    Multi,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Single => "single",
            ExtractionMode::Multi => "multi",
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExtractionMode {
    type Err = TxtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ExtractionMode::Single),
            "multi" => Ok(ExtractionMode::Multi),
            other => Err(TxtractError::Config(format!("unknown extraction mode: {}", other))),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Generic-fallback amounts must be strictly above this.
    pub fallback_min_amount: Decimal,

    /// Generic-fallback amounts must be strictly below this.
    pub fallback_max_amount: Decimal,

    /// Drop records whose date could not be parsed.
    pub strict_dates: bool,

    /// Largest input the CLI will hand to the engine.
    pub max_input_bytes: usize,

    /// Default extraction mode.
    pub mode: ExtractionMode,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_min_amount: Decimal::new(1, 1),
            fallback_max_amount: Decimal::from(10_000_000),
            strict_dates: false,
            max_input_bytes: 1024 * 1024,
            mode: ExtractionMode::Multi,
        }
    }
}

/// Category table configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryConfig {
    /// JSON category table replacing the built-in one.
    pub table_path: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "text",
        }
    }

    /// File extension for written results.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = TxtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(TxtractError::Config(format!("unknown output format: {}", other))),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,
}

impl TxtractConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build an engine from this configuration, loading the category table
    /// if one is configured.
    pub fn build_engine(&self) -> Result<TransactionEngine> {
        let extraction = &self.extraction;
        if extraction.fallback_min_amount >= extraction.fallback_max_amount {
            return Err(TxtractError::Config(format!(
                "fallback_min_amount ({}) must be below fallback_max_amount ({})",
                extraction.fallback_min_amount, extraction.fallback_max_amount
            )));
        }

        let classifier = match &self.categories.table_path {
            Some(path) => CategoryClassifier::from_file(path)?,
            None => CategoryClassifier::default(),
        };

        Ok(TransactionEngine::new()
            .with_classifier(classifier)
            .with_fallback_bounds(extraction.fallback_min_amount, extraction.fallback_max_amount)
            .with_strict_dates(extraction.strict_dates))
    }
}
