//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters, and
//! providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
    let path = Path::new(path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: AppConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;

    validate_config(&config)?;

    info!(
        bind = %config.server.bind_address,
        quote = %config.exchange.quote_label,
        page_size = config.pagination.page_size,
        "Configuration loaded successfully"
    );

    Ok(config)
}

/// Validate all configuration parameters.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    anyhow::ensure!(
        !config.server.bind_address.is_empty(),
        "server.bind_address must not be empty"
    );

    anyhow::ensure!(!config.database.url.is_empty(), "database.url must not be empty");
    anyhow::ensure!(
        config.database.max_connections > 0,
        "database.max_connections must be positive"
    );

    anyhow::ensure!(
        !config.exchange.base_url.is_empty(),
        "exchange.base_url must not be empty"
    );
    anyhow::ensure!(
        !config.exchange.quote_label.is_empty(),
        "exchange.quote_label must not be empty"
    );
    anyhow::ensure!(
        config.exchange.timeout_seconds > 0,
        "exchange.timeout_seconds must be positive, got {}",
        config.exchange.timeout_seconds
    );

    anyhow::ensure!(
        config.pagination.page_size > 0,
        "pagination.page_size must be positive"
    );
    anyhow::ensure!(
        config.pagination.max_page_size >= config.pagination.page_size,
        "pagination.max_page_size must be >= pagination.page_size ({} < {})",
        config.pagination.max_page_size,
        config.pagination.page_size
    );

    Ok(())
}
