//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::ledger::types::Network;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// HTTP surface settings (timeouts, CORS, static files).
    pub http: HttpConfig,

    /// Test network ledger endpoints.
    pub testnet: NetworkConfig,

    /// Main network ledger endpoints.
    pub mainnet: NetworkConfig,

    /// Price relay settings.
    pub price_feed: PriceFeedConfig,

    /// Hardware wallet settings.
    pub hardware: HardwareConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            http: HttpConfig::default(),
            testnet: NetworkConfig::default(),
            mainnet: NetworkConfig::mainnet(),
            price_feed: PriceFeedConfig::default(),
            hardware: HardwareConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Ledger settings for the given network.
    pub fn network(&self, network: Network) -> &NetworkConfig {
        match network {
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds. Payments wait for validation, so keep
    /// this above the ledger validation timeout.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Allow cross-origin requests from any origin.
    pub cors_enabled: bool,

    /// Directory of static files served for unmatched paths.
    pub static_dir: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 90,
            max_body_size: 64 * 1024,
            cors_enabled: true,
            static_dir: Some("public".to_string()),
        }
    }
}

/// Ledger network endpoints and submission settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// rippled JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Faucet URL that creates and funds new accounts (test networks only).
    pub faucet_url: Option<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Interval between validation polls in milliseconds.
    pub validation_poll_ms: u64,

    /// Maximum time to wait for a transaction or funding to validate.
    pub validation_timeout_secs: u64,

    /// Ledgers added to the current index for LastLedgerSequence.
    pub last_ledger_offset: u32,

    /// Highest fee, in drops, autofill will accept.
    pub max_fee_drops: u64,

    /// Maximum rows returned by `account_tx`.
    pub history_limit: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://s.altnet.rippletest.net:51234".to_string(),
            failover_urls: Vec::new(),
            faucet_url: Some("https://faucet.altnet.rippletest.net/accounts".to_string()),
            rpc_timeout_secs: 10,
            validation_poll_ms: 1000,
            validation_timeout_secs: 60,
            last_ledger_offset: 20,
            max_fee_drops: 2_000_000,
            history_limit: 20,
        }
    }
}

impl NetworkConfig {
    /// Defaults for the main network.
    pub fn mainnet() -> Self {
        Self {
            rpc_url: "https://s1.ripple.com:51234".to_string(),
            failover_urls: vec!["https://xrplcluster.com".to_string()],
            faucet_url: None,
            ..Self::default()
        }
    }
}

/// Price relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceFeedConfig {
    /// Enable the periodic `xrpData` broadcast.
    pub enabled: bool,

    /// Quotes endpoint of the price API.
    pub api_url: String,

    /// API key. Usually supplied through `PRICE_API_KEY`.
    pub api_key: Option<String>,

    /// Symbol to quote.
    pub symbol: String,

    /// Fiat currency to convert into.
    pub convert: String,

    /// Poll interval in seconds.
    pub interval_secs: u64,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://pro-api.coinmarketcap.com/v1/cryptocurrency/quotes/latest".to_string(),
            api_key: None,
            symbol: "XRP".to_string(),
            convert: "USD".to_string(),
            interval_secs: 60,
        }
    }
}

/// Hardware wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HardwareConfig {
    /// Network the device's account lives on.
    pub network: Network,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "xrpl_gateway=info,tower_http=info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
