//! Configuration Module - TOML-based Service Configuration
//!
//! Loads and validates configuration from `config.toml`. Endpoints,
//! database location, the conversion quote label, and pagination caps
//! are all externalized here - nothing is hardcoded in the domain
//! layer.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
///
/// Loaded from `config.toml` at startup. All fields are validated
/// before the server begins listening.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server binding and logging.
    pub server: ServerConfig,
    /// Relational store location.
    pub database: DatabaseConfig,
    /// Exchange-rate feed endpoint and conversion quote.
    pub exchange: ExchangeConfig,
    /// List-endpoint pagination defaults and caps.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Metrics exposition.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on, e.g. "0.0.0.0:8000".
    pub bind_address: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Relational store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLx connection URL, e.g. "sqlite://data/storefront.db?mode=rwc".
    pub url: String,
    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Exchange-rate feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Feed base URL.
    pub base_url: String,
    /// Display name of the quote used for foreign totals.
    #[serde(default = "default_quote_label")]
    pub quote_label: String,
    /// Outbound request timeout budget in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Pagination configuration for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationConfig {
    /// Page size when the request does not specify one.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on client-requested page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MetricsConfig {
    /// Enable the Prometheus /metrics endpoint.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// Default value functions for serde

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_quote_label() -> String {
    "Dolar Blue".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_true() -> bool {
    true
}
