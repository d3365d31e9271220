//! Transaction candidate model produced by the extraction engine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CategoryError;

/// One extracted, normalized transaction record.
///
/// Candidates are built once per extraction call and never mutated
/// afterwards; persisting them is the caller's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    /// Transaction instant (UTC midnight unless the token carried a time).
    pub date: DateTime<Utc>,

    /// Whether `date` was parsed from the text or substituted.
    pub date_resolution: DateResolution,

    /// Trimmed free-text label.
    pub description: String,

    /// Non-negative magnitude; the direction lives in `kind`.
    pub amount: Decimal,

    /// Debit or credit.
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Spending category derived from the description.
    pub category: Category,

    /// Running balance, present only when the text states one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,

    /// Static score of the pattern tier that produced the record.
    pub confidence: f32,

    /// Pattern tier that produced the record.
    pub pattern: PatternKind,

    /// Byte range `[start, end)` of the source text consumed by the match.
    pub span: (usize, usize),
}

impl TransactionCandidate {
    /// Amount with the direction applied (debits negative).
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Debit => -self.amount,
            TransactionType::Credit => self.amount,
        }
    }

    /// True if the date is the "now" substitute for an unparseable token.
    pub fn has_fallback_date(&self) -> bool {
        self.date_resolution == DateResolution::Fallback
    }
}

/// Direction of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money leaving the account. Used when direction is unknown.
    #[default]
    Debit,
    /// Money entering the account.
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a candidate's date was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateResolution {
    /// The token was recognized and parsed.
    Parsed,
    /// The token was unparseable and the current instant was used instead.
    Fallback,
}

/// Closed set of spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Health,
    Utilities,
    Transfer,
    /// Nothing in the keyword table matched.
    Other,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Health,
        Category::Utilities,
        Category::Transfer,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Utilities => "utilities",
            Self::Transfer => "transfer",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CategoryError::UnknownCategory(s.to_string()))
    }
}

/// Pattern tier that recognized a transaction, in cascade priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// `Date:` / `Description:` / `Amount:` labeled block.
    Labeled,
    /// `date | description | amount | dr/cr` line.
    PipeDelimited,
    /// `date / description / amount / dr/cr` line.
    SlashDelimited,
    /// `Vendor * detail` then `dd/mm/yyyy -> Rs amount debited`.
    VendorArrow,
    /// `[txn-id] yyyy-mm-dd description amount Dr|Cr [Bal amount]`.
    IsoInline,
    /// `Rs 500 debited ... on <date>`.
    NarrativeAmountFirst,
    /// `debited by Rs 500 ... on <date>`.
    NarrativeAccountFirst,
    /// `paid Rs 500 ... on <date>`.
    NarrativePayment,
    /// `received Rs 500 ... on <date>`.
    NarrativeReceipt,
    /// `transfer of Rs 500 ... on <date>`.
    NarrativeTransfer,
    /// Any date token next to any currency amount.
    GenericFallback,
}

impl PatternKind {
    /// Cascade order, most specific first.
    pub const CASCADE: [PatternKind; 11] = [
        PatternKind::Labeled,
        PatternKind::PipeDelimited,
        PatternKind::SlashDelimited,
        PatternKind::VendorArrow,
        PatternKind::IsoInline,
        PatternKind::NarrativeAmountFirst,
        PatternKind::NarrativeAccountFirst,
        PatternKind::NarrativePayment,
        PatternKind::NarrativeReceipt,
        PatternKind::NarrativeTransfer,
        PatternKind::GenericFallback,
    ];

    /// Static confidence of a match produced by this tier.
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Labeled => 0.95,
            Self::PipeDelimited => 0.93,
            Self::VendorArrow => 0.92,
            Self::SlashDelimited => 0.91,
            Self::IsoInline => 0.90,
            Self::NarrativeAmountFirst => 0.88,
            Self::NarrativeAccountFirst => 0.87,
            Self::NarrativePayment => 0.86,
            Self::NarrativeReceipt => 0.85,
            Self::NarrativeTransfer => 0.84,
            Self::GenericFallback => 0.70,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Labeled => "labeled",
            Self::PipeDelimited => "pipe_delimited",
            Self::SlashDelimited => "slash_delimited",
            Self::VendorArrow => "vendor_arrow",
            Self::IsoInline => "iso_inline",
            Self::NarrativeAmountFirst => "narrative_amount_first",
            Self::NarrativeAccountFirst => "narrative_account_first",
            Self::NarrativePayment => "narrative_payment",
            Self::NarrativeReceipt => "narrative_receipt",
            Self::NarrativeTransfer => "narrative_transfer",
            Self::GenericFallback => "generic_fallback",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from_str("Food").unwrap(), Category::Food);
        assert_eq!(Category::from_str(" utilities ").unwrap(), Category::Utilities);
        assert_eq!(
            Category::from_str("groceries"),
            Err(CategoryError::UnknownCategory("groceries".to_string()))
        );
    }

    #[test]
    fn test_fallback_confidence_is_lowest() {
        let fallback = PatternKind::GenericFallback.confidence();
        for kind in &PatternKind::CASCADE[..10] {
            assert!(kind.confidence() > fallback, "{kind} should beat the fallback");
            assert!(kind.confidence() <= 1.0);
        }
    }

    #[test]
    fn test_signed_amount() {
        let candidate = TransactionCandidate {
            date: Utc::now(),
            date_resolution: DateResolution::Parsed,
            description: "Swiggy".to_string(),
            amount: Decimal::new(45000, 2),
            kind: TransactionType::Debit,
            category: Category::Food,
            balance: None,
            confidence: 0.88,
            pattern: PatternKind::NarrativeAmountFirst,
            span: (0, 10),
        };
        assert_eq!(candidate.signed_amount(), Decimal::new(-45000, 2));
        assert!(!candidate.has_fallback_date());
    }

    #[test]
    fn test_serialized_type_field() {
        let json = serde_json::to_string(&TransactionType::Credit).unwrap();
        assert_eq!(json, "\"credit\"");
        let json = serde_json::to_string(&PatternKind::VendorArrow).unwrap();
        assert_eq!(json, "\"vendor_arrow\"");
    }
}
