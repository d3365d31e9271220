//! Transaction extraction: pattern cascade, normalization and classification.

mod cascade;
mod category;
mod engine;
mod overlap;
pub mod rules;

pub use cascade::{cascade, clean_description, PatternCapture, PatternTier};
pub use category::{CategoryClassifier, CategoryEntry};
pub use engine::{ExtractionReport, TransactionEngine};
pub use overlap::OverlapTracker;

use crate::models::config::ExtractionMode;
use crate::models::transaction::TransactionCandidate;

/// Trait for transaction extractors.
pub trait TransactionExtractor {
    /// Single-best mode: the first successful match in cascade order.
    fn extract_one(&self, text: &str) -> Option<TransactionCandidate>;

    /// Multi-match mode: every non-overlapping match, in acceptance order.
    fn extract_all(&self, text: &str) -> Vec<TransactionCandidate>;

    /// Run either mode.
    fn extract_with_mode(&self, text: &str, mode: ExtractionMode) -> Vec<TransactionCandidate> {
        match mode {
            ExtractionMode::Single => self.extract_one(text).into_iter().collect(),
            ExtractionMode::Multi => self.extract_all(text),
        }
    }
}
