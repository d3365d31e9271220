//! Rule-based token extractors shared by the pattern cascade.

pub mod amounts;
pub mod balance;
pub mod counterparty;
pub mod dates;
pub mod direction;
pub mod patterns;

pub use amounts::{parse_amount, CurrencyAmountExtractor};
pub use balance::find_balance;
pub use counterparty::{recover_counterparty, recover_payee};
pub use dates::{normalize_date, parse_date_token, DateTokenExtractor, NormalizedDate};
pub use direction::{direction_from_keyword, infer_direction};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all non-overlapping occurrences, left to right.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Byte range `[start, end)` in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
