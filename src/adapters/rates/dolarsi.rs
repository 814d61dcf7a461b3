//! DolarSi Client - Exchange-Rate Feed over HTTP
//!
//! Fetches the feed's main quote list
//! (`GET {base_url}/api/api.php?type=valoresprincipales`) and maps the
//! wire shape `[{ "casa": { "nombre", "compra", "venta" } }]` into
//! domain quote records. Rate fields stay in their raw comma-decimal
//! string form; normalization happens in the pricing engine.
//!
//! One blocking request per call with a fixed timeout budget. No
//! retries, no caching - a failure is the caller's to surface.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ExchangeConfig;
use crate::domain::pricing::CurrencyQuote;
use crate::ports::rate_feed::{RateFeed, RateFeedError};

/// HTTP client for the DolarSi quote feed.
pub struct DolarSiClient {
    http: Client,
    base_url: String,
}

/// Wire format: each entry wraps its quote in a `casa` object.
#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    casa: QuoteStand,
}

#[derive(Debug, Deserialize)]
struct QuoteStand {
    nombre: String,
    #[serde(default)]
    compra: String,
    #[serde(default)]
    venta: String,
}

impl DolarSiClient {
    /// Build a client with the configured base URL and timeout budget.
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RateFeed for DolarSiClient {
    async fn main_quotes(&self) -> Result<Vec<CurrencyQuote>, RateFeedError> {
        let url = format!("{}/api/api.php?type=valoresprincipales", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("exchange rate request failed")?
            .error_for_status()
            .context("exchange rate feed returned an error status")?;

        let envelopes: Vec<QuoteEnvelope> = response
            .json()
            .await
            .context("malformed exchange rate payload")?;

        debug!(quotes = envelopes.len(), "exchange rate feed fetched");
        Ok(envelopes
            .into_iter()
            .map(|envelope| CurrencyQuote {
                name: envelope.casa.nombre,
                buy: envelope.casa.compra,
                sell: envelope.casa.venta,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_maps_to_quotes() {
        let payload = r#"[
            {"casa": {"compra": "98,53", "venta": "104,53", "nombre": "Dolar Oficial", "decimales": "2"}},
            {"casa": {"compra": "182,00", "venta": "186,00", "nombre": "Dolar Blue"}},
            {"casa": {"compra": "No Cotiza", "venta": "No Cotiza", "nombre": "Dolar Soja"}}
        ]"#;
        let envelopes: Vec<QuoteEnvelope> = serde_json::from_str(payload).unwrap();
        assert_eq!(envelopes.len(), 3);
        assert_eq!(envelopes[1].casa.nombre, "Dolar Blue");
        assert_eq!(envelopes[1].casa.compra, "182,00");
    }

    #[test]
    fn test_missing_rate_fields_default_to_empty() {
        let payload = r#"[{"casa": {"nombre": "Bitcoin"}}]"#;
        let envelopes: Vec<QuoteEnvelope> = serde_json::from_str(payload).unwrap();
        assert_eq!(envelopes[0].casa.compra, "");
        assert_eq!(envelopes[0].casa.venta, "");
    }
}
