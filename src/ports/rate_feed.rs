//! Rate Feed Port - Exchange-Rate Quote Interface
//!
//! The pricing usecase needs the current list of named currency quotes;
//! where they come from (and the feed's wire format) is an adapter
//! concern. The call is synchronous request/response with a fixed
//! timeout, never retried and never cached.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::pricing::CurrencyQuote;

/// Feed failure: network error, timeout, non-success status, or a
/// payload that does not parse.
#[derive(Debug, Error)]
pub enum RateFeedError {
    #[error("exchange rate feed unavailable: {0}")]
    Upstream(#[from] anyhow::Error),
}

/// Provider of current currency quotes.
#[async_trait]
pub trait RateFeed: Send + Sync + 'static {
    /// Fetch the feed's current main quote list.
    async fn main_quotes(&self) -> Result<Vec<CurrencyQuote>, RateFeedError>;
}
