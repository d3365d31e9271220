//! Debit/credit inference from direction keywords.

use rust_decimal::Decimal;

use crate::models::transaction::TransactionType;

const DEBIT_WORDS: [&str; 11] = [
    "debit",
    "debited",
    "dr",
    "paid",
    "sent",
    "spent",
    "transfer",
    "transferred",
    "charged",
    "withdrawal",
    "withdrawn",
];

const CREDIT_WORDS: [&str; 6] = ["credit", "credited", "cr", "received", "deposit", "deposited"];

/// Map a single keyword to a direction, if it belongs to either lexicon.
pub fn direction_from_keyword(word: &str) -> Option<TransactionType> {
    let word = word.trim().trim_end_matches('.').to_lowercase();
    if DEBIT_WORDS.contains(&word.as_str()) {
        Some(TransactionType::Debit)
    } else if CREDIT_WORDS.contains(&word.as_str()) {
        Some(TransactionType::Credit)
    } else {
        None
    }
}

/// Decide the direction of a match.
///
/// A recognized keyword always wins. Without one, `signed_amount` (only
/// supplied by the labeled tier) decides: negative is a debit, anything
/// else a credit. Otherwise the transaction is a debit.
pub fn infer_direction(keyword: Option<&str>, signed_amount: Option<Decimal>) -> TransactionType {
    if let Some(kind) = keyword.and_then(direction_from_keyword) {
        return kind;
    }

    match signed_amount {
        Some(amount) if amount.is_sign_negative() => TransactionType::Debit,
        Some(_) => TransactionType::Credit,
        None => TransactionType::Debit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lexicons() {
        assert_eq!(direction_from_keyword("Debited"), Some(TransactionType::Debit));
        assert_eq!(direction_from_keyword("DR."), Some(TransactionType::Debit));
        assert_eq!(direction_from_keyword("withdrawal"), Some(TransactionType::Debit));
        assert_eq!(direction_from_keyword("Cr"), Some(TransactionType::Credit));
        assert_eq!(direction_from_keyword("deposit"), Some(TransactionType::Credit));
        assert_eq!(direction_from_keyword("refund"), None);
    }

    #[test]
    fn test_keyword_beats_sign() {
        assert_eq!(
            infer_direction(Some("cr"), Some(Decimal::new(-100, 0))),
            TransactionType::Credit
        );
    }

    #[test]
    fn test_sign_decides_without_keyword() {
        assert_eq!(infer_direction(None, Some(Decimal::new(-42000, 2))), TransactionType::Debit);
        assert_eq!(infer_direction(None, Some(Decimal::new(42000, 2))), TransactionType::Credit);
        assert_eq!(infer_direction(None, Some(Decimal::ZERO)), TransactionType::Credit);
    }

    #[test]
    fn test_default_is_debit() {
        assert_eq!(infer_direction(None, None), TransactionType::Debit);
        assert_eq!(infer_direction(Some("towards"), None), TransactionType::Debit);
    }
}
