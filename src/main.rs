//! Storefront Backend — Entry Point
//!
//! Initializes configuration, logging, the relational store, and the
//! exchange-rate client, then serves the JSON API until SIGINT.
//!
//! Wiring sequence:
//! 1. Load config.toml + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Connect SQLite store + run embedded migrations
//! 4. Create DolarSi rate-feed client (timeout budget from config)
//! 5. Register Prometheus metrics
//! 6. Serve axum router (API + /live + /ready + /metrics) until SIGINT

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use storefront_backend::adapters::http::{AppState, serve};
use storefront_backend::adapters::metrics::MetricsRegistry;
use storefront_backend::adapters::persistence::SqliteStore;
use storefront_backend::adapters::rates::DolarSiClient;
use storefront_backend::config;
use storefront_backend::ports::rate_feed::RateFeed;
use storefront_backend::ports::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from config.toml ──────────────
    let config = config::loader::load_config("config.toml")
        .context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&config.server.log_level)
            }),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.server.bind_address,
        quote = %config.exchange.quote_label,
        "Starting storefront backend"
    );

    // ── 3. Connect the store and run migrations ─────────────
    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::connect(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to open the database")?,
    );

    // ── 4. Exchange-rate feed client ────────────────────────
    let feed: Arc<dyn RateFeed> = Arc::new(
        DolarSiClient::new(&config.exchange).context("Failed to build rate feed client")?,
    );

    // ── 5. Metrics registry ─────────────────────────────────
    let metrics =
        Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);

    // ── 6. Serve until SIGINT ───────────────────────────────
    let state = AppState::new(store, feed, metrics, &config);
    serve(state, &config.server.bind_address).await?;

    info!("Shutdown complete");
    Ok(())
}
