//! Startup orchestration.
//!
//! Subsystems initialize in order and any failure is fatal: config is
//! already validated, then observability, ledger clients, and finally the
//! listener so traffic only arrives once everything is ready.

use std::io;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, GatewayConfig, ObservabilityConfig};
use crate::http::{AppState, HttpServer};
use crate::ledger::LedgerError;
use crate::observability::{init_logging, metrics, LogFormat};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create ledger client: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },
}

/// Install the tracing subscriber and, when enabled, the metrics exporter.
pub fn init_observability(config: &ObservabilityConfig) {
    init_logging(&config.log_level, LogFormat::from_str_lossy(&config.log_format));

    if config.metrics_enabled {
        match config.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }
}

/// Build the server and bind its listener.
pub async fn start(config: GatewayConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        testnet_rpc = %config.testnet.rpc_url,
        mainnet_rpc = %config.mainnet.rpc_url,
        hardware_network = %config.hardware.network,
        price_feed = config.price_feed.enabled,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    Ok((HttpServer::new(config, state), listener))
}
