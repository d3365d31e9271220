//! The ordered pattern table.
//!
//! Each tier pairs a [`PatternKind`] and its confidence with a matcher: a
//! pure function from text to every `(span, capture)` it recognizes. The
//! engine walks the table in order; nothing falls through implicitly.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::transaction::PatternKind;

use super::rules::patterns::{
    DIRECTION_WORD, ISO_INLINE, LABELED, NARRATIVE_ACCOUNT_FIRST, NARRATIVE_AMOUNT_FIRST,
    NARRATIVE_PAYMENT, NARRATIVE_RECEIPT, NARRATIVE_TRANSFER, PIPE_DELIMITED, SLASH_DELIMITED,
    VENDOR_ARROW,
};
use super::rules::{
    recover_counterparty, recover_payee, CurrencyAmountExtractor, DateTokenExtractor,
    ExtractionMatch, FieldExtractor,
};

/// Raw tokens captured by one tier, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCapture {
    /// Date token as written.
    pub date: String,
    /// Separately captured vendor, if the tier has one.
    pub vendor: Option<String>,
    /// Cleaned description or detail text (may be empty).
    pub description: String,
    /// Amount token as written, possibly with currency and sign.
    pub amount: String,
    /// Direction keyword, if the tier captured one.
    pub keyword: Option<String>,
}

type Matcher = fn(&str) -> Vec<(usize, usize, PatternCapture)>;

/// One recognizer in the cascade.
pub struct PatternTier {
    pub kind: PatternKind,
    pub confidence: f32,
    matcher: Matcher,
}

impl PatternTier {
    fn new(kind: PatternKind, matcher: Matcher) -> Self {
        Self {
            kind,
            confidence: kind.confidence(),
            matcher,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.kind == PatternKind::GenericFallback
    }
}

impl FieldExtractor for PatternTier {
    type Output = ExtractionMatch<PatternCapture>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        (self.matcher)(text)
            .into_iter()
            .map(|(start, end, capture)| {
                ExtractionMatch::new(capture, self.confidence, &text[start..end])
                    .with_position(start, end)
            })
            .collect()
    }
}

lazy_static! {
    static ref CASCADE: Vec<PatternTier> = vec![
        PatternTier::new(PatternKind::Labeled, match_labeled),
        PatternTier::new(PatternKind::PipeDelimited, match_pipe_delimited),
        PatternTier::new(PatternKind::SlashDelimited, match_slash_delimited),
        PatternTier::new(PatternKind::VendorArrow, match_vendor_arrow),
        PatternTier::new(PatternKind::IsoInline, match_iso_inline),
        PatternTier::new(PatternKind::NarrativeAmountFirst, match_narrative_amount_first),
        PatternTier::new(PatternKind::NarrativeAccountFirst, match_narrative_account_first),
        PatternTier::new(PatternKind::NarrativePayment, match_narrative_payment),
        PatternTier::new(PatternKind::NarrativeReceipt, match_narrative_receipt),
        PatternTier::new(PatternKind::NarrativeTransfer, match_narrative_transfer),
        PatternTier::new(PatternKind::GenericFallback, match_generic_fallback),
    ];
}

/// All tiers in priority order; the generic fallback is last.
pub fn cascade() -> &'static [PatternTier] {
    &CASCADE
}

/// Collapse whitespace and trim separator debris from a description.
pub fn clean_description(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '-' | '>' | '<' | '=' | ':' | '|' | ',' | ';' | '*' | '→' | '.')
        })
        .to_string()
}

fn group(caps: &Captures, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().trim().to_string())
}

fn span_of(caps: &Captures) -> (usize, usize) {
    // Group 0 always participates in a match.
    caps.get(0).map_or((0, 0), |m| (m.start(), m.end()))
}

fn match_labeled(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    LABELED
        .captures_iter(text)
        .map(|caps| {
            let (start, end) = span_of(&caps);
            let capture = PatternCapture {
                date: group(&caps, "date").unwrap_or_default(),
                vendor: None,
                description: clean_description(&caps["desc"]),
                amount: group(&caps, "amount").unwrap_or_default(),
                keyword: group(&caps, "kind"),
            };
            (start, end, capture)
        })
        .collect()
}

fn match_delimited(regex: &Regex, text: &str) -> Vec<(usize, usize, PatternCapture)> {
    regex
        .captures_iter(text)
        .map(|caps| {
            let (start, end) = span_of(&caps);
            let capture = PatternCapture {
                date: group(&caps, "date").unwrap_or_default(),
                vendor: None,
                description: clean_description(&caps["desc"]),
                amount: group(&caps, "amount").unwrap_or_default(),
                keyword: group(&caps, "kind"),
            };
            (start, end, capture)
        })
        .collect()
}

fn match_pipe_delimited(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    match_delimited(&PIPE_DELIMITED, text)
}

fn match_slash_delimited(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    match_delimited(&SLASH_DELIMITED, text)
}

fn match_vendor_arrow(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    VENDOR_ARROW
        .captures_iter(text)
        .map(|caps| {
            let (start, end) = span_of(&caps);
            let capture = PatternCapture {
                date: group(&caps, "date").unwrap_or_default(),
                vendor: Some(clean_description(&caps["vendor"])),
                description: caps
                    .name("detail")
                    .map(|m| clean_description(m.as_str()))
                    .unwrap_or_default(),
                amount: group(&caps, "amount").unwrap_or_default(),
                keyword: group(&caps, "kind"),
            };
            (start, end, capture)
        })
        .collect()
}

fn match_iso_inline(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    ISO_INLINE
        .captures_iter(text)
        .map(|caps| {
            let (mut start, end) = span_of(&caps);
            // The leading separator belongs to whatever precedes the record.
            let leading = text[start..end].len() - text[start..end].trim_start().len();
            start += leading;
            let capture = PatternCapture {
                date: group(&caps, "date").unwrap_or_default(),
                vendor: None,
                description: clean_description(&caps["desc"]),
                amount: group(&caps, "amount").unwrap_or_default(),
                keyword: group(&caps, "kind"),
            };
            (start, end, capture)
        })
        .collect()
}

fn match_narrative(regex: &Regex, text: &str) -> Vec<(usize, usize, PatternCapture)> {
    regex
        .captures_iter(text)
        .map(|caps| {
            let (start, end) = span_of(&caps);
            let description = recover_counterparty(&text[start..end])
                .map(|party| clean_description(&party))
                .unwrap_or_default();
            let capture = PatternCapture {
                date: group(&caps, "date").unwrap_or_default(),
                vendor: None,
                description,
                amount: group(&caps, "amount").unwrap_or_default(),
                keyword: group(&caps, "kind"),
            };
            (start, end, capture)
        })
        .collect()
}

fn match_narrative_amount_first(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    match_narrative(&NARRATIVE_AMOUNT_FIRST, text)
}

fn match_narrative_account_first(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    match_narrative(&NARRATIVE_ACCOUNT_FIRST, text)
}

fn match_narrative_payment(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    match_narrative(&NARRATIVE_PAYMENT, text)
}

fn match_narrative_receipt(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    match_narrative(&NARRATIVE_RECEIPT, text)
}

fn match_narrative_transfer(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    match_narrative(&NARRATIVE_TRANSFER, text)
}

/// Pair every date token with the first currency amount after it, or the
/// nearest one before it when none follows.
fn match_generic_fallback(text: &str) -> Vec<(usize, usize, PatternCapture)> {
    let dates = DateTokenExtractor::new().extract_all(text);
    let amounts: Vec<_> = CurrencyAmountExtractor::new()
        .extract_all(text)
        .into_iter()
        .filter_map(|a| a.position.map(|pos| (pos, a.source)))
        .filter(|((start, end), _)| {
            !dates.iter().any(|d| {
                d.position
                    .is_some_and(|(ds, de)| *start < de && *end > ds)
            })
        })
        .collect();

    let mut results = Vec::new();
    for date in &dates {
        let Some((date_start, date_end)) = date.position else {
            continue;
        };

        let paired = amounts
            .iter()
            .find(|((start, _), _)| *start >= date_end)
            .or_else(|| amounts.iter().rev().find(|((_, end), _)| *end <= date_start));
        let Some(((amount_start, amount_end), amount_source)) = paired else {
            continue;
        };

        let start = date_start.min(*amount_start);
        let end = date_end.max(*amount_end);
        let gap = &text[date_end.min(*amount_end)..date_start.max(*amount_start)];

        let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);
        let mut description = clean_description(gap);
        if description.chars().count() < 3 {
            description = recover_payee(&text[end..line_end])
                .map(|party| clean_description(&party))
                .unwrap_or_default();
        }

        let keyword = DIRECTION_WORD
            .find(&text[start..line_end])
            .map(|m| m.as_str().to_string());

        let capture = PatternCapture {
            date: date.value.clone(),
            vendor: None,
            description,
            amount: amount_source.clone(),
            keyword,
        };
        results.push((start, end, capture));
    }

    results
}
