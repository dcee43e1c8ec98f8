//! Market data types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot of the XRP market as relayed to browser clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XrpMarketData {
    pub symbol: String,
    /// Currency the figures are quoted in.
    pub convert: String,
    pub price: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: Option<f64>,
    #[serde(rename = "percentChange24h")]
    pub percent_change_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub last_updated: Option<String>,
}

/// Errors raised while fetching prices.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Price API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Price API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Price API response missing {0}")]
    Missing(String),

    #[error("Price API key not configured")]
    NoApiKey,
}
