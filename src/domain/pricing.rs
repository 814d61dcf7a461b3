//! Order pricing math.
//!
//! Local totals are exact decimal sums of `unit_price * quantity`; the
//! empty aggregate is undefined (`None`), never zero. Foreign totals
//! divide by the buy-side rate of a named quote from the exchange feed
//! and round to 2 decimal places - the only place rounding happens.
//!
//! Feed rates arrive as strings with a comma decimal separator
//! (`"182,00"`); normalization to a numeric decimal happens here so the
//! rest of the crate never sees the raw format.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::OrderLine;

/// One named quote record from the exchange-rate feed, rates kept in
/// the feed's raw comma-decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    /// Display name, e.g. "Dolar Blue".
    pub name: String,
    /// Buy-side rate, e.g. "182,00". May be non-numeric ("No Cotiza").
    pub buy: String,
    /// Sell-side rate.
    pub sell: String,
}

/// Failure to derive a usable rate from the feed's quote list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("no quote named {0:?} in the exchange rate feed")]
    NotFound(String),

    #[error("quote {label:?} has an unusable buy rate {raw:?}")]
    BadRate { label: String, raw: String },
}

/// Sum of `unit_price * quantity` over an order's line items.
///
/// Returns `None` for an order with no line items: the aggregate is
/// undefined, not zero.
pub fn total_local(lines: &[OrderLine]) -> Option<Decimal> {
    if lines.is_empty() {
        return None;
    }
    let mut total = Decimal::ZERO;
    for line in lines {
        let price = Decimal::from_f64(line.unit_price).unwrap_or(Decimal::ZERO);
        total += price * Decimal::from(line.item.quantity);
    }
    Some(total)
}

/// Scan `quotes` for the entry named `label` and parse its buy rate.
///
/// The rate string uses a comma as decimal separator. A missing entry,
/// a non-numeric rate, or a rate that is not strictly positive (the
/// conversion divides by it) is an error.
pub fn buy_rate(quotes: &[CurrencyQuote], label: &str) -> Result<Decimal, QuoteError> {
    let quote = quotes
        .iter()
        .find(|q| q.name == label)
        .ok_or_else(|| QuoteError::NotFound(label.to_string()))?;

    quote
        .buy
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .ok()
        .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
        .ok_or_else(|| QuoteError::BadRate {
            label: label.to_string(),
            raw: quote.buy.clone(),
        })
}

/// Convert a local total to foreign currency, rounded to 2 decimals.
pub fn to_foreign(total: Decimal, rate: Decimal) -> Decimal {
    (total / rate).round_dp(2)
}
