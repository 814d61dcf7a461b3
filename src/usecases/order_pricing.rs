//! Order Pricing - Totals in Local and Foreign Currency
//!
//! Wraps the pure pricing math around the rate-feed port. Quotes are
//! fetched at most once per call, shared across every order in a list
//! response, and not fetched at all when no order in the batch has any
//! line items (the empty aggregate is undefined and needs no rate).
//!
//! A feed failure or a missing/unusable quote is surfaced to the
//! caller - there is no fallback value for the foreign total.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::catalog::OrderWithItems;
use crate::domain::pricing;
use crate::domain::pricing::QuoteError;
use crate::ports::rate_feed::{RateFeed, RateFeedError};

/// Computed totals for one order. Both are `None` for an order with no
/// line items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    /// Exact sum of `unit_price * quantity`, unrounded.
    pub local: Option<f64>,
    /// Local total divided by the buy rate, rounded to 2 decimals.
    pub foreign: Option<f64>,
}

impl OrderTotals {
    const EMPTY: Self = Self { local: None, foreign: None };
}

/// Failure to compute a foreign-currency total.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Feed(#[from] RateFeedError),
}

/// Computes order totals against a quote feed.
pub struct OrderPricer {
    feed: Arc<dyn RateFeed>,
    /// Display name of the quote used for conversion.
    quote_label: String,
}

impl OrderPricer {
    pub fn new(feed: Arc<dyn RateFeed>, quote_label: impl Into<String>) -> Self {
        Self { feed, quote_label: quote_label.into() }
    }

    /// Totals for a single order.
    pub async fn price(&self, order: &OrderWithItems) -> Result<OrderTotals, PricingError> {
        let mut totals = self.price_all(std::slice::from_ref(order)).await?;
        // price_all returns exactly one entry per input order.
        Ok(totals.pop().unwrap_or(OrderTotals::EMPTY))
    }

    /// Totals for a batch of orders, fetching quotes at most once.
    #[instrument(skip(self, orders), fields(orders = orders.len(), quote = %self.quote_label))]
    pub async fn price_all(
        &self,
        orders: &[OrderWithItems],
    ) -> Result<Vec<OrderTotals>, PricingError> {
        let locals: Vec<Option<Decimal>> = orders
            .iter()
            .map(|order| pricing::total_local(&order.lines))
            .collect();

        if locals.iter().all(Option::is_none) {
            return Ok(vec![OrderTotals::EMPTY; locals.len()]);
        }

        let quotes = self.feed.main_quotes().await?;
        let rate = pricing::buy_rate(&quotes, &self.quote_label)?;
        debug!(%rate, quotes = quotes.len(), "exchange rate resolved");

        Ok(locals
            .into_iter()
            .map(|total| match total {
                None => OrderTotals::EMPTY,
                Some(total) => OrderTotals {
                    local: total.to_f64(),
                    foreign: pricing::to_foreign(total, rate).to_f64(),
                },
            })
            .collect())
    }
}
