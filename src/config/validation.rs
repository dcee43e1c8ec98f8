//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are collected so a
//! bad config file can be fixed in one pass.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{GatewayConfig, NetworkConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::new("http.request_timeout_secs", "must be greater than 0"));
    }
    if config.http.max_body_size == 0 {
        errors.push(ValidationError::new("http.max_body_size", "must be greater than 0"));
    }

    validate_network("testnet", &config.testnet, &mut errors);
    validate_network("mainnet", &config.mainnet, &mut errors);

    if config.price_feed.enabled {
        check_url("price_feed.api_url", &config.price_feed.api_url, &mut errors);
        if config.price_feed.interval_secs == 0 {
            errors.push(ValidationError::new("price_feed.interval_secs", "must be greater than 0"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "is not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(name: &str, network: &NetworkConfig, errors: &mut Vec<ValidationError>) {
    check_url(&format!("{}.rpc_url", name), &network.rpc_url, errors);
    for (i, url) in network.failover_urls.iter().enumerate() {
        check_url(&format!("{}.failover_urls[{}]", name, i), url, errors);
    }
    if let Some(url) = &network.faucet_url {
        check_url(&format!("{}.faucet_url", name), url, errors);
    }

    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(format!("{}.rpc_timeout_secs", name), "must be greater than 0"));
    }
    if network.validation_poll_ms == 0 {
        errors.push(ValidationError::new(format!("{}.validation_poll_ms", name), "must be greater than 0"));
    }
    if network.validation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            format!("{}.validation_timeout_secs", name),
            "must be greater than 0",
        ));
    }
    if network.last_ledger_offset == 0 {
        errors.push(ValidationError::new(format!("{}.last_ledger_offset", name), "must be greater than 0"));
    }
}

fn check_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e))),
    }
}
