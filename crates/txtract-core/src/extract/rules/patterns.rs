//! Common regex patterns for transaction extraction.
//!
//! Building blocks are kept as string fragments so every tier agrees on what
//! a currency, an amount and a date token look like.

use lazy_static::lazy_static;
use regex::Regex;

/// Currency marker: `Rs`, `Rs.`, `INR`, `USD`, `EUR`, `GBP` or a symbol.
pub const CURRENCY: &str = r"(?:\b(?:Rs\.?|INR|USD|EUR|GBP)|[₹$€£])";

/// Signed number with optional grouping commas and decimals.
pub const NUMBER: &str = r"-?\d[\d,]*(?:\.\d+)?";

/// Date token in any shape the normalizer understands, with an optional
/// time of day (`14:30`, `10:30:05`, `10:30 AM`).
pub const DATE: &str = r"\b(?:\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}|\d{1,2}[ \-](?i:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-zA-Z]*\.?[ ,\-]+\d{2,4})(?:(?:,?[ \t]+|T)\d{1,2}:\d{2}(?::\d{2})?(?:[ \t]*(?i:am|pm))?)?\b";

/// Optional trailing time of day for the anchored date shapes.
const TIME_OF_DAY: &str = r"(?:(?:,?\s+|T)(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([AaPp][Mm]))?)?";

/// Debit/credit keyword as written in tabular and inline statements.
const DR_CR: &str = r"(?P<kind>debited|credited|debit|credit|dr|cr)\b\.?";

lazy_static! {
    // Tier 1: labeled block, optionally followed by a balance line
    pub static ref LABELED: Regex = Regex::new(
        r"(?im)^[ \t]*(?:(?:txn|transaction|value)[ \t]+)?date[ \t]*:[ \t]*(?P<date>[^\n]+?)[ \t]*\r?\n[ \t]*(?:description|merchant|narration)[ \t]*:[ \t]*(?P<desc>[^\n]+?)[ \t]*\r?\n[ \t]*amount[ \t]*:[ \t]*(?P<amount>[^\n]+?)(?:[ \t]+(?P<kind>debit|credit|dr|cr)\.?)?[ \t]*(?:\r?\n[ \t]*[^\n]*\bbal(?:ance)?\b[^\n]*)?$"
    ).unwrap();

    // Tier 2: date | description | amount | dr/cr
    pub static ref PIPE_DELIMITED: Regex = Regex::new(&format!(
        r"(?im)^[ \t]*\|?[ \t]*(?P<date>{DATE})[ \t]*\|[ \t]*(?P<desc>[^|\n]+?)[ \t]*\|[ \t]*(?P<amount>[^|\n]+?)[ \t]*\|[ \t]*{DR_CR}[^\n]*"
    )).unwrap();

    // Tier 3: date / description / amount / dr/cr
    pub static ref SLASH_DELIMITED: Regex = Regex::new(&format!(
        r"(?im)^[ \t]*(?P<date>{DATE})[ \t]+/[ \t]+(?P<desc>[^\n]+?)[ \t]+/[ \t]+(?P<amount>[^/\n]+?)[ \t]+/[ \t]+{DR_CR}[^\n]*"
    )).unwrap();

    // Tier 4: "Vendor * detail" then "dd/mm/yyyy -> Rs1,250.00 debited"
    pub static ref VENDOR_ARROW: Regex = Regex::new(&format!(
        r"(?im)^[ \t]*(?P<vendor>[^\n*]+?)(?:[ \t]*\*[ \t]*(?P<detail>[^\n]*?))?[ \t]*(?:\r?\n[ \t]*|[ \t]+)(?P<date>\d{{1,2}}/\d{{1,2}}/\d{{2,4}})[ \t]*(?:->|→|=>|:)[ \t]*{CURRENCY}[ \t]*(?P<amount>{NUMBER})[ \t]*(?P<kind>debited|credited|dr|cr)\b"
    )).unwrap();

    // Tier 5: [txn-id] yyyy-mm-dd description amount Dr|Cr [Bal amount]
    pub static ref ISO_INLINE: Regex = Regex::new(&format!(
        r"(?im)(?:^|[ \t])(?:[a-z0-9][\w\-]*[ \t]+)?(?P<date>\d{{4}}-\d{{2}}-\d{{2}}(?:[ T]\d{{2}}:\d{{2}}(?::\d{{2}})?)?)[ \t]+(?P<desc>[^\n]+?)[ \t]+{CURRENCY}[ \t]*(?P<amount>{NUMBER})[ \t]*{DR_CR}(?:[ \t]+(?:(?:avl|available|closing)\.?[ \t]+)?bal(?:ance)?\b[^\n\d]*{NUMBER})?"
    )).unwrap();

    // Tier 6: "Rs 500.00 debited from a/c XX1234 on 05-12-25 to swiggy"
    pub static ref NARRATIVE_AMOUNT_FIRST: Regex = Regex::new(&format!(
        r"(?i){CURRENCY}[ \t]*(?P<amount>{NUMBER})[ \t]+(?:(?:has[ \t]+been|is|was|got)[ \t]+)?(?P<kind>debited|credited|paid|received|sent|transferred|spent|deposited|withdrawn)\b[^\n]*?\b(?:on|at|dated)[ \t]+(?P<date>{DATE})[^\n]*"
    )).unwrap();

    // Tier 7: "debited by Rs.450.00 on 11-Dec-2025 for ZOMATO"
    pub static ref NARRATIVE_ACCOUNT_FIRST: Regex = Regex::new(&format!(
        r"(?i)\b(?P<kind>debited|credited)[ \t]+(?:by|with|for)[ \t]+{CURRENCY}[ \t]*(?P<amount>{NUMBER})[^\n]*?\b(?:on|at|dated)[ \t]+(?P<date>{DATE})[^\n]*"
    )).unwrap();

    // Tier 8: "paid Rs.250 to Uber on 12/11/2025"
    pub static ref NARRATIVE_PAYMENT: Regex = Regex::new(&format!(
        r"(?i)\b(?P<kind>paid|sent|spent)[ \t]+{CURRENCY}[ \t]*(?P<amount>{NUMBER})[^\n]*?\b(?:on|at|dated)[ \t]+(?P<date>{DATE})[^\n]*"
    )).unwrap();

    // Tier 9: "received Rs 1,000 from Rahul on 03/12/2025"
    pub static ref NARRATIVE_RECEIPT: Regex = Regex::new(&format!(
        r"(?i)\b(?P<kind>received)[ \t]+(?:(?:a[ \t]+)?(?:payment|credit|amount)[ \t]+of[ \t]+)?{CURRENCY}[ \t]*(?P<amount>{NUMBER})[^\n]*?\b(?:on|at|dated)[ \t]+(?P<date>{DATE})[^\n]*"
    )).unwrap();

    // Tier 10: "transfer of Rs 5,000 to savings on 01-12-2025"
    pub static ref NARRATIVE_TRANSFER: Regex = Regex::new(&format!(
        r"(?i)\b(?P<kind>transferred|transfer|withdrawal|deposited|deposit)[ \t]+(?:of[ \t]+)?{CURRENCY}[ \t]*(?P<amount>{NUMBER})[^\n]*?\b(?:on|at|dated)[ \t]+(?P<date>{DATE})[^\n]*"
    )).unwrap();

    // Fallback building blocks
    pub static ref DATE_TOKEN: Regex = Regex::new(&format!(r"(?i){DATE}")).unwrap();

    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(&format!(
        r"(?i){CURRENCY}[ \t]*(?P<amount>{NUMBER})"
    )).unwrap();

    // Running balance, e.g. "Avl Bal: Rs 1,234.50" or "Balance after transaction: 18,420.50"
    pub static ref BALANCE: Regex = Regex::new(&format!(
        r"(?i)\b(?:(?:avl|avail|available|closing|current|ledger)\.?[ \t]+)?bal(?:ance)?\b\.?[^\n\d]{{0,40}}?(?:->|→|:)?[ \t]*(?:{CURRENCY}[ \t]*)?(?P<amount>\d[\d,]*(?:\.\d+)?)"
    )).unwrap();

    // "to/from/for/at/towards <party>" clause
    pub static ref COUNTERPARTY_CLAUSE: Regex = Regex::new(
        r"(?im)\b(?P<prep>to|from|for|at|towards)[ \t]+(?:(?:vpa|merchant)[ \t]+)?(?P<party>[^\n,;()]+?)[ \t]*(?:\b(?:on|ref|via|avl|bal|using|txn|info|dated)\b|[,;\n()]|\.(?:[ \t]|$)|$)"
    ).unwrap();

    // Words that name the account holder's own account, not a counterparty
    pub static ref OWN_ACCOUNT: Regex = Regex::new(
        r"(?i)^(?:a/c|ac\b|acct|account|your\b|you\b|card\b|the[ \t]+account|savings[ \t]+a/c)"
    ).unwrap();

    // Direction keyword anywhere in free text
    pub static ref DIRECTION_WORD: Regex = Regex::new(
        r"(?i)\b(debited|debit|dr|paid|sent|spent|transferred|transfer|charged|withdrawal|withdrawn|credited|credit|cr|received|deposited|deposit)\b"
    ).unwrap();

    // Normalizer shapes (anchored)
    // Anchored shapes; groups 4-7 hold hour, minute, second and AM/PM
    pub static ref TEXTUAL_DATE: Regex = Regex::new(&format!(
        r"^(\d{{1,2}})[\s,\-]+([A-Za-z]{{3,9}})\.?[\s,\-]+(\d{{4}}|\d{{2}}){TIME_OF_DAY}$"
    )).unwrap();

    pub static ref DAY_FIRST_DATE: Regex = Regex::new(&format!(
        r"^(\d{{1,2}})[/.\-](\d{{1,2}})[/.\-](\d{{4}}|\d{{2}}){TIME_OF_DAY}$"
    )).unwrap();

    pub static ref ISO_DATE: Regex = Regex::new(&format!(
        r"^(\d{{4}})-(\d{{1,2}})-(\d{{1,2}}){TIME_OF_DAY}$"
    )).unwrap();
}
