//! Shared helpers for in-process router tests.
//!
//! Each test builds the real axum router over a fresh in-memory
//! SQLite store and a canned rate feed, then drives it with
//! `tower::ServiceExt::oneshot` — no network I/O involved.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use storefront_backend::adapters::http::{AppState, build_router};
use storefront_backend::adapters::metrics::MetricsRegistry;
use storefront_backend::adapters::persistence::SqliteStore;
use storefront_backend::config::AppConfig;
use storefront_backend::domain::pricing::CurrencyQuote;
use storefront_backend::ports::rate_feed::{RateFeed, RateFeedError};

/// Feed stub answering with a fixed quote list.
pub struct FixedFeed(pub Vec<CurrencyQuote>);

#[async_trait]
impl RateFeed for FixedFeed {
    async fn main_quotes(&self) -> Result<Vec<CurrencyQuote>, RateFeedError> {
        Ok(self.0.clone())
    }
}

/// Feed stub that always fails, as an unreachable upstream would.
pub struct FailingFeed;

#[async_trait]
impl RateFeed for FailingFeed {
    async fn main_quotes(&self) -> Result<Vec<CurrencyQuote>, RateFeedError> {
        Err(RateFeedError::Upstream(anyhow::anyhow!("connection refused")))
    }
}

pub fn quote(name: &str, buy: &str) -> CurrencyQuote {
    CurrencyQuote {
        name: name.to_string(),
        buy: buy.to_string(),
        sell: buy.to_string(),
    }
}

/// The quote list used across the order tests: blue buys at 182,00.
pub fn standard_quotes() -> Vec<CurrencyQuote> {
    vec![
        quote("Dolar Oficial", "98,53"),
        quote("Dolar Blue", "182,00"),
        quote("Dolar Soja", "No Cotiza"),
    ]
}

pub fn test_config() -> AppConfig {
    toml::from_str(
        r#"
        [server]
        bind_address = "127.0.0.1:0"

        [database]
        url = "sqlite::memory:"

        [exchange]
        base_url = "http://feed.invalid"
        "#,
    )
    .expect("test config parses")
}

pub async fn state_with_feed(feed: Arc<dyn RateFeed>) -> AppState {
    let store = Arc::new(
        SqliteStore::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory store"),
    );
    let metrics = Arc::new(MetricsRegistry::new().expect("metrics registry"));
    AppState::new(store, feed, metrics, &test_config())
}

pub async fn router_with_feed(feed: Arc<dyn RateFeed>) -> Router {
    build_router(state_with_feed(feed).await)
}

/// Router over the standard quote list.
pub async fn router() -> Router {
    router_with_feed(Arc::new(FixedFeed(standard_quotes()))).await
}

/// Drive the router with one request; returns status and parsed body
/// (`Value::Null` for empty bodies such as 204 and 405 responses).
pub async fn call(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    };

    let response = app.oneshot(request).await.expect("oneshot failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Create a product through the API, asserting success.
pub async fn seed_product(app: &Router, id: &str, name: &str, price: f64, stock: i64) {
    let (status, body) = call(
        app.clone(),
        "POST",
        "/api/products",
        Some(json!({ "id": id, "name": name, "price": price, "stock": stock })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed product failed: {body}");
}

/// Create an order through the API, asserting success, returning the body.
pub async fn seed_order(app: &Router, id: &str, details: Value) -> Value {
    let (status, body) = call(
        app.clone(),
        "POST",
        "/api/orders",
        Some(json!({ "id": id, "order_details": details })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed order failed: {body}");
    body
}
