//! Keyword-based category classification.
//!
//! The table is an ordered list and the first category with a matching
//! keyword wins, so entry order is the priority. The default order is
//! food, transport, shopping, entertainment, health, utilities, transfer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CategoryError, Result};
use crate::models::transaction::Category;

/// One row of the keyword table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Immutable, ordered category → keywords table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryClassifier {
    entries: Vec<CategoryEntry>,
}

impl CategoryClassifier {
    /// Build a classifier from ordered entries. Keywords are lower-cased.
    pub fn new(entries: Vec<CategoryEntry>) -> std::result::Result<Self, CategoryError> {
        let mut normalized: Vec<CategoryEntry> = Vec::with_capacity(entries.len());

        for entry in entries {
            if normalized.iter().any(|e| e.category == entry.category) {
                return Err(CategoryError::Duplicate(entry.category.to_string()));
            }

            let mut keywords = Vec::with_capacity(entry.keywords.len());
            for keyword in entry.keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(CategoryError::EmptyKeyword(entry.category.to_string()));
                }
                keywords.push(keyword);
            }

            normalized.push(CategoryEntry {
                category: entry.category,
                keywords,
            });
        }

        Ok(Self {
            entries: normalized,
        })
    }

    /// Parse a JSON array of `{"category": ..., "keywords": [...]}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CategoryEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries)?)
    }

    /// Load a JSON table from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// First category whose keyword occurs in the description, ignoring case.
    /// Keywords of up to five characters must appear as whole words.
    pub fn classify(&self, description: &str) -> Option<Category> {
        let description = description.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.keywords.iter().any(|k| contains_keyword(&description, k)))
            .map(|entry| entry.category)
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        let entries = DEFAULT_TABLE
            .iter()
            .map(|(category, keywords)| CategoryEntry {
                category: *category,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();

        Self { entries }
    }
}

/// Longest keyword that is matched only as a whole word.
const WHOLE_WORD_MAX_CHARS: usize = 5;

fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    if keyword.chars().count() > WHOLE_WORD_MAX_CHARS {
        return haystack.contains(keyword);
    }

    haystack.match_indices(keyword).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + keyword.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

const DEFAULT_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            "starbucks", "coffee", "cafe", "restaurant", "zomato", "swiggy", "domino", "pizza",
            "mcdonald", "kfc", "burger", "subway", "dunkin", "bakery", "dining", "eatery",
            "biryani", "food",
        ],
    ),
    (
        Category::Transport,
        &[
            "uber", "ola cabs", "olacabs", "rapido", "taxi", "metro", "railway", "irctc",
            "indigo", "air india", "airline", "flight", "redbus", "petrol", "diesel", "fuel",
            "parking", "fastag",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "flipkart", "myntra", "ajio", "meesho", "nykaa", "dmart", "big bazaar",
            "walmart", "ikea", "decathlon", "mall", "shopping", "retail",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "netflix", "spotify", "prime video", "hotstar", "bookmyshow", "pvr", "inox",
            "cinema", "movie", "youtube", "steam", "playstation", "concert",
        ],
    ),
    (
        Category::Health,
        &[
            "pharmacy", "apollo", "medplus", "hospital", "clinic", "doctor", "diagnostic",
            "1mg", "pharmeasy", "netmeds", "medical", "dental", "health",
        ],
    ),
    (
        Category::Utilities,
        &[
            "electricity", "bescom", "tata power", "water bill", "gas bill", "broadband",
            "internet", "airtel", "jio", "vodafone", "bsnl", "recharge", "postpaid", "dth",
            "utility",
        ],
    ),
    (
        Category::Transfer,
        &["transfer", "upi", "neft", "imps", "rtgs", "p2p", "wallet"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_table() {
        let classifier = CategoryClassifier::default();

        assert_eq!(classifier.classify("STARBUCKS COFFEE MUMBAI"), Some(Category::Food));
        assert_eq!(classifier.classify("Uber Ride - Airport Drop"), Some(Category::Transport));
        assert_eq!(
            classifier.classify("Amazon.in Order #403-1234567-8901234"),
            Some(Category::Shopping)
        );
        assert_eq!(classifier.classify("Netflix subscription"), Some(Category::Entertainment));
        assert_eq!(classifier.classify("Apollo Pharmacy"), Some(Category::Health));
        assert_eq!(classifier.classify("BESCOM bill"), Some(Category::Utilities));
        assert_eq!(classifier.classify("NEFT to Rahul"), Some(Category::Transfer));
        assert_eq!(classifier.classify("Mystery Vendor"), None);
    }

    #[test]
    fn test_short_keywords_match_whole_words() {
        let classifier = CategoryClassifier::default();

        assert_eq!(classifier.classify("Post Office Small Savings"), None);
        assert_eq!(classifier.classify("steamed momos"), None);
        assert_eq!(classifier.classify("Phoenix Mall"), Some(Category::Shopping));
        assert_eq!(classifier.classify("STEAM PURCHASE"), Some(Category::Entertainment));
        assert_eq!(classifier.classify("UPI/P2M/Ref 5321"), Some(Category::Transfer));
    }

    #[test]
    fn test_long_keywords_match_inside_words() {
        let classifier = CategoryClassifier::default();
        assert_eq!(classifier.classify("MyStarbucksCard reload"), Some(Category::Food));
        assert_eq!(classifier.classify("eBankTransfer 0042"), Some(Category::Transfer));
    }

    #[test]
    fn test_first_match_wins() {
        // "swiggy" (food) is listed before "upi" (transfer)
        let classifier = CategoryClassifier::default();
        assert_eq!(classifier.classify("swiggy@upi"), Some(Category::Food));
    }

    #[test]
    fn test_custom_table_order() {
        let classifier = CategoryClassifier::new(vec![
            CategoryEntry {
                category: Category::Transfer,
                keywords: vec!["UPI".to_string()],
            },
            CategoryEntry {
                category: Category::Food,
                keywords: vec!["swiggy".to_string()],
            },
        ])
        .unwrap();

        assert_eq!(classifier.classify("swiggy@upi"), Some(Category::Transfer));
        assert_eq!(classifier.entries()[0].keywords, vec!["upi".to_string()]);
    }

    #[test]
    fn test_rejects_bad_tables() {
        let empty = CategoryClassifier::new(vec![CategoryEntry {
            category: Category::Food,
            keywords: vec!["  ".to_string()],
        }]);
        assert_eq!(empty, Err(CategoryError::EmptyKeyword("food".to_string())));

        let duplicate = CategoryClassifier::new(vec![
            CategoryEntry {
                category: Category::Food,
                keywords: vec!["cafe".to_string()],
            },
            CategoryEntry {
                category: Category::Food,
                keywords: vec!["pizza".to_string()],
            },
        ]);
        assert_eq!(duplicate, Err(CategoryError::Duplicate("food".to_string())));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"category": "health", "keywords": ["gym"]},
            {"category": "food", "keywords": ["tea"]}
        ]"#;

        let classifier = CategoryClassifier::from_json(json).unwrap();
        assert_eq!(classifier.classify("Gold's Gym"), Some(Category::Health));
        assert_eq!(classifier.classify("Chai tea stall"), Some(Category::Food));
        assert_eq!(classifier.classify("Uber"), None);

        assert!(CategoryClassifier::from_json(r#"[{"category": "pets", "keywords": ["vet"]}]"#).is_err());
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let classifier = CategoryClassifier::default();
        let json = classifier.to_json().unwrap();
        assert_eq!(CategoryClassifier::from_json(&json).unwrap(), classifier);
    }
}
