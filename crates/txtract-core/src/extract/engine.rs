//! Cascading transaction engine.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use crate::models::config::ExtractionMode;
use crate::models::transaction::{
    Category, DateResolution, PatternKind, TransactionCandidate, TransactionType,
};

use super::cascade::{cascade, PatternCapture, PatternTier};
use super::category::CategoryClassifier;
use super::overlap::OverlapTracker;
use super::rules::{
    find_balance, infer_direction, normalize_date, parse_amount, ExtractionMatch, FieldExtractor,
};
use super::TransactionExtractor;

/// Outcome of one extraction call with timing information.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Mode the text was scanned in.
    pub mode: ExtractionMode,
    /// Extracted records.
    pub candidates: Vec<TransactionCandidate>,
    /// Number of records whose date is the "now" substitute.
    pub fallback_dates: usize,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Pattern-cascade transaction engine.
///
/// Holds only immutable configuration, so one engine can serve any number
/// of concurrent calls.
#[derive(Debug, Clone)]
pub struct TransactionEngine {
    /// Keyword table used to categorize descriptions.
    classifier: CategoryClassifier,
    /// Fallback amounts must be strictly above this.
    fallback_min: Decimal,
    /// Fallback amounts must be strictly below this.
    fallback_max: Decimal,
    /// Drop records whose date could not be parsed.
    strict_dates: bool,
}

/// A match that passed normalization; only the balance is still missing.
struct Normalized {
    date: chrono::DateTime<chrono::Utc>,
    date_resolution: DateResolution,
    description: String,
    amount: Decimal,
    kind: TransactionType,
    category: Category,
    confidence: f32,
    pattern: PatternKind,
    span: (usize, usize),
}

impl Normalized {
    fn into_candidate(self, balance: Option<Decimal>) -> TransactionCandidate {
        TransactionCandidate {
            date: self.date,
            date_resolution: self.date_resolution,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            balance,
            confidence: self.confidence,
            pattern: self.pattern,
            span: self.span,
        }
    }
}

impl TransactionEngine {
    /// Create an engine with the default category table and fallback bounds.
    pub fn new() -> Self {
        Self {
            classifier: CategoryClassifier::default(),
            fallback_min: Decimal::new(1, 1),
            fallback_max: Decimal::from(10_000_000),
            strict_dates: false,
        }
    }

    /// Replace the category table.
    pub fn with_classifier(mut self, classifier: CategoryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the exclusive amount bounds for generic-fallback matches.
    pub fn with_fallback_bounds(mut self, min: Decimal, max: Decimal) -> Self {
        self.fallback_min = min;
        self.fallback_max = max;
        self
    }

    /// Drop records whose date token could not be parsed instead of
    /// stamping them with the current instant.
    pub fn with_strict_dates(mut self, strict: bool) -> Self {
        self.strict_dates = strict;
        self
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    /// Run an extraction and report timing alongside the records.
    pub fn scan(&self, text: &str, mode: ExtractionMode) -> ExtractionReport {
        let start = Instant::now();
        let candidates = self.extract_with_mode(text, mode);
        let fallback_dates = candidates.iter().filter(|c| c.has_fallback_date()).count();

        ExtractionReport {
            mode,
            candidates,
            fallback_dates,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn within_fallback_bounds(&self, amount: Decimal) -> bool {
        amount > self.fallback_min && amount < self.fallback_max
    }

    fn normalize(
        &self,
        tier: &PatternTier,
        found: &ExtractionMatch<PatternCapture>,
    ) -> Option<Normalized> {
        let span = found.position?;
        let capture = &found.value;

        let Some(signed) = parse_amount(&capture.amount) else {
            debug!(
                "Malformed amount {:?} in {} match, skipping",
                capture.amount, tier.kind
            );
            return None;
        };
        let amount = signed.abs();

        if tier.is_fallback() && !self.within_fallback_bounds(amount) {
            debug!("Fallback amount {} outside sanity bounds, rejecting", amount);
            return None;
        }

        let date = normalize_date(&capture.date);
        if date.resolution == DateResolution::Fallback && self.strict_dates {
            debug!("Unparseable date {:?} rejected in strict mode", capture.date);
            return None;
        }

        let sign_hint = (tier.kind == PatternKind::Labeled).then_some(signed);
        let kind = infer_direction(capture.keyword.as_deref(), sign_hint);
        let description = compose_description(capture.vendor.as_deref(), &capture.description);
        let category = self
            .classifier
            .classify(&description)
            .unwrap_or(Category::Other);

        Some(Normalized {
            date: date.instant,
            date_resolution: date.resolution,
            description,
            amount,
            kind,
            category,
            confidence: tier.confidence,
            pattern: tier.kind,
            span,
        })
    }

    fn scan_tier(
        &self,
        tier: &PatternTier,
        text: &str,
        tracker: &mut OverlapTracker,
        accepted: &mut Vec<Normalized>,
    ) {
        for found in tier.extract_all(text) {
            let Some((start, end)) = found.position else {
                continue;
            };
            if tracker.is_overlapping(start, end) {
                trace!("{} match at {}..{} overlaps a claimed span", tier.kind, start, end);
                continue;
            }
            if let Some(normalized) = self.normalize(tier, &found) {
                debug!(
                    "Accepted {} match at {}..{} (confidence {:.2})",
                    tier.kind, start, end, tier.confidence
                );
                tracker.claim(start, end);
                accepted.push(normalized);
            }
        }
    }
}

impl Default for TransactionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionExtractor for TransactionEngine {
    fn extract_one(&self, text: &str) -> Option<TransactionCandidate> {
        if text.trim().is_empty() {
            return None;
        }

        debug!("Single-best extraction over {} bytes", text.len());

        for tier in cascade() {
            for found in tier.extract_all(text) {
                if let Some(normalized) = self.normalize(tier, &found) {
                    let (start, end) = normalized.span;
                    debug!("Accepted {} match at {}..{}", tier.kind, start, end);
                    let balance = find_balance(&text[start..end]);
                    return Some(normalized.into_candidate(balance));
                }
            }
        }

        debug!("No pattern matched");
        None
    }

    fn extract_all(&self, text: &str) -> Vec<TransactionCandidate> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        debug!("Multi-match extraction over {} bytes", text.len());

        let mut tracker = OverlapTracker::new();
        let mut accepted = Vec::new();

        for tier in cascade().iter().filter(|t| !t.is_fallback()) {
            self.scan_tier(tier, text, &mut tracker, &mut accepted);
        }

        if accepted.is_empty() {
            for tier in cascade().iter().filter(|t| t.is_fallback()) {
                self.scan_tier(tier, text, &mut tracker, &mut accepted);
            }
        }

        // Balance window: own span start up to the next accepted record's start.
        let starts: Vec<usize> = accepted.iter().map(|n| n.span.0).collect();
        let candidates: Vec<TransactionCandidate> = accepted
            .into_iter()
            .map(|normalized| {
                let start = normalized.span.0;
                let window_end = starts
                    .iter()
                    .copied()
                    .filter(|&s| s > start)
                    .min()
                    .unwrap_or(text.len());
                let balance = find_balance(&text[start..window_end]);
                normalized.into_candidate(balance)
            })
            .collect();

        debug!("Extracted {} transactions", candidates.len());
        candidates
    }
}

/// `"<vendor> - <detail>"` when both are present, otherwise whichever is.
fn compose_description(vendor: Option<&str>, detail: &str) -> String {
    let detail = detail.trim();
    match vendor.map(str::trim).filter(|v| !v.is_empty()) {
        Some(vendor) if detail.is_empty() => vendor.to_string(),
        Some(vendor) => format!("{} - {}", vendor, detail),
        None => detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CategoryEntry;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_compose_description() {
        assert_eq!(compose_description(Some("Uber Ride"), "Airport Drop"), "Uber Ride - Airport Drop");
        assert_eq!(compose_description(Some("Uber Ride"), ""), "Uber Ride");
        assert_eq!(compose_description(None, "Swiggy"), "Swiggy");
        assert_eq!(compose_description(Some("  "), "Swiggy"), "Swiggy");
    }

    #[test]
    fn test_labeled_scenario() {
        let engine = TransactionEngine::new();
        let text = "Date: 11 Dec 2025\nDescription: STARBUCKS COFFEE MUMBAI\nAmount: -420.00\nBalance after transaction: 18,420.50";

        let candidate = engine.extract_one(text).unwrap();
        assert_eq!(candidate.amount, dec("420.00"));
        assert_eq!(candidate.kind, TransactionType::Debit);
        assert_eq!(candidate.category, Category::Food);
        assert_eq!(candidate.confidence, 0.95);
        assert_eq!(candidate.balance, Some(dec("18420.50")));
        assert_eq!(candidate.description, "STARBUCKS COFFEE MUMBAI");
    }

    #[test]
    fn test_labeled_positive_amount_is_credit() {
        let engine = TransactionEngine::new();
        let text = "Date: 01/12/2025\nMerchant: ACME Payroll\nAmount: 85,000.00";

        let candidate = engine.extract_one(text).unwrap();
        assert_eq!(candidate.kind, TransactionType::Credit);
        assert_eq!(candidate.balance, None);
    }

    #[test]
    fn test_malformed_amount_falls_through() {
        // The labeled block's amount cannot be parsed, so the ISO line below wins.
        let engine = TransactionEngine::new();
        let text = "Date: 11 Dec 2025\nDescription: Coffee\nAmount: four hundred\n2025-12-10 Zomato order Rs 310.00 Dr";

        let candidate = engine.extract_one(text).unwrap();
        assert_eq!(candidate.pattern, PatternKind::IsoInline);
        assert_eq!(candidate.amount, dec("310.00"));
    }

    #[test]
    fn test_fallback_sanity_bounds() {
        let engine = TransactionEngine::new();
        assert!(engine.extract_one("03/12/2025 fee Rs 0.05").is_none());
        assert!(engine.extract_one("03/12/2025 valuation Rs 25,000,000").is_none());

        let candidate = engine.extract_one("03/12/2025 fee Rs 5").unwrap();
        assert_eq!(candidate.pattern, PatternKind::GenericFallback);
        assert_eq!(candidate.confidence, 0.70);
    }

    #[test]
    fn test_custom_fallback_bounds() {
        let engine = TransactionEngine::new().with_fallback_bounds(dec("0"), dec("100"));
        assert!(engine.extract_one("03/12/2025 fee Rs 0.05").is_some());
        assert!(engine.extract_one("03/12/2025 fee Rs 150").is_none());
    }

    #[test]
    fn test_strict_dates() {
        let text = "Date: sometime\nDescription: Coffee\nAmount: -10.00";

        let lenient = TransactionEngine::new().extract_one(text).unwrap();
        assert_eq!(lenient.date_resolution, DateResolution::Fallback);

        let strict = TransactionEngine::new().with_strict_dates(true);
        assert!(strict.extract_one(text).is_none());
    }

    #[test]
    fn test_custom_classifier() {
        let classifier = CategoryClassifier::new(vec![CategoryEntry {
            category: Category::Health,
            keywords: vec!["coffee".to_string()],
        }])
        .unwrap();
        let engine = TransactionEngine::new().with_classifier(classifier);

        let candidate = engine
            .extract_one("Date: 11 Dec 2025\nDescription: Coffee Day\nAmount: -10.00")
            .unwrap();
        assert_eq!(candidate.category, Category::Health);

        let candidate = engine
            .extract_one("Date: 11 Dec 2025\nDescription: Swiggy\nAmount: -10.00")
            .unwrap();
        assert_eq!(candidate.category, Category::Other);
    }

    #[test]
    fn test_multi_balances_do_not_leak() {
        let engine = TransactionEngine::new();
        let text = "2025-12-01 Swiggy Rs 450.00 Dr\n2025-12-02 Salary Rs 50,000.00 Cr Bal 61,200.00";

        let candidates = engine.extract_all(text);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].balance, None);
        assert_eq!(candidates[1].balance, Some(dec("61200.00")));
        assert_eq!(candidates[1].kind, TransactionType::Credit);
    }

    #[test]
    fn test_scan_report() {
        let engine = TransactionEngine::new();
        let report = engine.scan("Random text without transaction data", ExtractionMode::Multi);
        assert!(report.candidates.is_empty());
        assert_eq!(report.fallback_dates, 0);
        assert_eq!(report.mode, ExtractionMode::Multi);
    }
}
