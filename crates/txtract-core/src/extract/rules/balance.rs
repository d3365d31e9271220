//! Running-balance lookup.

use rust_decimal::Decimal;

use super::amounts::parse_amount;
use super::patterns::BALANCE;

/// First balance-labeled amount in `text`, as a magnitude.
pub fn find_balance(text: &str) -> Option<Decimal> {
    BALANCE
        .captures_iter(text)
        .find_map(|caps| parse_amount(&caps["amount"]))
        .map(|amount| amount.abs())
}
