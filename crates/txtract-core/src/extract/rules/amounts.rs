//! Amount parsing and currency-amount detection.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::CURRENCY_AMOUNT;
use super::{ExtractionMatch, FieldExtractor};

/// Currency markers stripped from either end of an amount token.
const CURRENCY_MARKERS: [&str; 10] = ["rs.", "rs", "inr", "usd", "eur", "gbp", "₹", "$", "€", "£"];

/// Confidence reported for a bare currency amount. Lower than a date token
/// since a currency marker can precede any number in free text.
pub const AMOUNT_TOKEN_CONFIDENCE: f32 = 0.8;

/// Finds currency-prefixed amounts (`Rs 1,250.00`, `₹99`, `USD 12.5`).
pub struct CurrencyAmountExtractor;

impl CurrencyAmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyAmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CURRENCY_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let amount = parse_amount(&caps["amount"])?;
                Some(
                    ExtractionMatch::new(amount, AMOUNT_TOKEN_CONFIDENCE, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Parse an amount token into a signed decimal.
///
/// Currency markers at either end, surrounding whitespace and grouping
/// commas are removed. What remains must be an optionally signed number
/// with at most one decimal point; anything else yields `None`.
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let mut rest = token.trim();
    let mut negative = false;

    // Sign may come before or after the currency marker ("-Rs 5", "Rs -5").
    for _ in 0..2 {
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = !negative;
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped.trim_start();
        }
        rest = strip_currency_prefix(rest).trim_start();
    }
    rest = strip_currency_suffix(rest).trim_end();

    let cleaned: String = rest.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty()
        || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.')
        || cleaned.matches('.').count() > 1
        || cleaned.starts_with('.')
        || cleaned.ends_with('.')
    {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

fn strip_currency_prefix(s: &str) -> &str {
    for marker in CURRENCY_MARKERS {
        if s.len() >= marker.len()
            && s.is_char_boundary(marker.len())
            && s[..marker.len()].eq_ignore_ascii_case(marker)
        {
            return &s[marker.len()..];
        }
    }
    s
}

fn strip_currency_suffix(s: &str) -> &str {
    for marker in CURRENCY_MARKERS {
        if s.len() >= marker.len() {
            let cut = s.len() - marker.len();
            if s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(marker) {
                return &s[..cut];
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,250.00"), Some(dec("1250.00")));
        assert_eq!(parse_amount("-420.00"), Some(dec("-420.00")));
        assert_eq!(parse_amount("Rs. 2,999"), Some(dec("2999")));
        assert_eq!(parse_amount("₹17,170.50"), Some(dec("17170.50")));
        assert_eq!(parse_amount("-Rs 75"), Some(dec("-75")));
        assert_eq!(parse_amount("450.00 INR"), Some(dec("450.00")));
        assert_eq!(parse_amount("  12.5  "), Some(dec("12.5")));
    }

    #[test]
    fn test_parse_amount_rejects_residue() {
        assert_eq!(parse_amount("12.50 (approx)"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("Rs"), None);
        assert_eq!(parse_amount("12."), None);
    }

    #[test]
    fn test_extract_currency_amounts() {
        let extractor = CurrencyAmountExtractor::new();
        let text = "Paid Rs 250 and USD 12.50, ref 99887";

        let results = extractor.extract_all(text);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, dec("250"));
        assert_eq!(results[1].value, dec("12.50"));
        assert_eq!(results[0].position, Some((5, 11)));
        assert!(results.iter().all(|r| r.confidence == AMOUNT_TOKEN_CONFIDENCE));
    }
}
