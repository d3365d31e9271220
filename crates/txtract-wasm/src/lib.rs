//! WASM bindings for transaction extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Records cross the boundary as plain objects via `serde-wasm-bindgen`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use txtract_core::{
    CategoryClassifier, Category, ExtractionMode, TransactionCandidate, TransactionEngine,
    TransactionExtractor,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract the single best transaction from text, or `undefined`.
#[wasm_bindgen]
pub fn extract_one(text: &str) -> Result<JsValue, JsValue> {
    match TransactionEngine::new().extract_one(text) {
        Some(candidate) => to_js(&candidate),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Extract every non-overlapping transaction from text.
#[wasm_bindgen]
pub fn extract_all(text: &str) -> Result<JsValue, JsValue> {
    to_js(&TransactionEngine::new().extract_all(text))
}

/// Categorize a description with the built-in keyword table.
#[wasm_bindgen]
pub fn classify(description: &str) -> String {
    CategoryClassifier::default()
        .classify(description)
        .unwrap_or(Category::Other)
        .as_str()
        .to_string()
}

/// Normalize a date token to an RFC 3339 string, or `undefined` if unparseable.
#[wasm_bindgen]
pub fn normalize_date(token: &str) -> Option<String> {
    txtract_core::extract::rules::parse_date_token(token).map(|d| d.to_rfc3339())
}

/// Transaction scanner class for browser use.
#[wasm_bindgen]
pub struct TransactionScanner {
    engine: TransactionEngine,
}

#[derive(Serialize)]
struct ScanResult<'a> {
    transactions: &'a [TransactionCandidate],
    fallback_dates: usize,
    processing_time_ms: f64,
}

#[wasm_bindgen]
impl TransactionScanner {
    /// Create a scanner with the built-in category table.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: TransactionEngine::new(),
        }
    }

    /// Create a scanner from a JSON category table.
    #[wasm_bindgen]
    pub fn with_category_table(json: &str) -> Result<TransactionScanner, JsValue> {
        let classifier =
            CategoryClassifier::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            engine: TransactionEngine::new().with_classifier(classifier),
        })
    }

    /// Drop transactions whose date could not be parsed.
    #[wasm_bindgen]
    pub fn set_strict_dates(&mut self, strict: bool) {
        self.engine = self.engine.clone().with_strict_dates(strict);
    }

    /// Extract the single best transaction, or `undefined`.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        match self.engine.extract_one(text) {
            Some(candidate) => to_js(&candidate),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Extract every non-overlapping transaction.
    #[wasm_bindgen]
    pub fn extract_all(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.engine.extract_all(text))
    }

    /// Extract in either mode ("single" or "multi") with timing metadata.
    #[wasm_bindgen]
    pub fn scan(&self, text: &str, mode: &str) -> Result<JsValue, JsValue> {
        let mode: ExtractionMode = mode.parse().map_err(|e: txtract_core::TxtractError| {
            JsValue::from_str(&e.to_string())
        })?;

        let start = js_sys::Date::now();
        let transactions = self.engine.extract_with_mode(text, mode);
        let fallback_dates = transactions.iter().filter(|t| t.has_fallback_date()).count();

        if fallback_dates > 0 {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "{} transaction(s) have an unparseable date; the current time was used",
                fallback_dates
            )));
        }

        to_js(&ScanResult {
            transactions: &transactions,
            fallback_dates,
            processing_time_ms: js_sys::Date::now() - start,
        })
    }
}

impl Default for TransactionScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_classify() {
        assert_eq!(classify("STARBUCKS COFFEE MUMBAI"), "food");
        assert_eq!(classify("Rahul"), "other");
    }

    #[wasm_bindgen_test]
    fn test_normalize_date() {
        assert_eq!(
            normalize_date("11 Dec 2025").as_deref(),
            Some("2025-12-11T00:00:00+00:00")
        );
        assert_eq!(normalize_date("someday"), None);
    }

    #[wasm_bindgen_test]
    fn test_extract_one_without_match() {
        assert!(extract_one("Random text without transaction data").unwrap().is_undefined());
    }

    #[wasm_bindgen_test]
    fn test_scanner_strict_dates() {
        let mut scanner = TransactionScanner::new();
        let text = "Date: someday\nDescription: Coffee\nAmount: -10.00";
        assert!(!scanner.extract(text).unwrap().is_undefined());

        scanner.set_strict_dates(true);
        assert!(scanner.extract(text).unwrap().is_undefined());
    }
}
