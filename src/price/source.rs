//! Third-party price API clients.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::PriceFeedConfig;
use crate::price::types::{PriceError, XrpMarketData};

/// Header carrying the CoinMarketCap API key.
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Anything that can produce a market snapshot.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self) -> Result<XrpMarketData, PriceError>;
}

/// CoinMarketCap `quotes/latest` client.
pub struct CoinMarketCapSource {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    symbol: String,
    convert: String,
}

impl CoinMarketCapSource {
    /// Build from config. Fails if no API key is configured.
    pub fn from_config(config: &PriceFeedConfig) -> Result<Self, PriceError> {
        let api_key = config.api_key.clone().ok_or(PriceError::NoApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            symbol: config.symbol.clone(),
            convert: config.convert.clone(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinMarketCapSource {
    async fn fetch(&self) -> Result<XrpMarketData, PriceError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("symbol", self.symbol.as_str()), ("convert", self.convert.as_str())])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            let message = body
                .pointer("/status/error_message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(PriceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_quote(&body, &self.symbol, &self.convert)
    }
}

/// Extract one symbol's quote from a `quotes/latest` body.
///
/// v1 keys `data` by symbol to an object; v2 maps it to an array.
pub fn parse_quote(body: &Value, symbol: &str, convert: &str) -> Result<XrpMarketData, PriceError> {
    let entry = body
        .get("data")
        .and_then(|d| d.get(symbol))
        .map(|e| match e {
            Value::Array(items) => items.first().unwrap_or(&Value::Null),
            other => other,
        })
        .filter(|e| e.is_object())
        .ok_or_else(|| PriceError::Missing(format!("data.{}", symbol)))?;

    let quote = entry
        .get("quote")
        .and_then(|q| q.get(convert))
        .ok_or_else(|| PriceError::Missing(format!("quote.{}", convert)))?;

    let price = quote
        .get("price")
        .and_then(Value::as_f64)
        .ok_or_else(|| PriceError::Missing("price".to_string()))?;

    Ok(XrpMarketData {
        symbol: symbol.to_string(),
        convert: convert.to_string(),
        price,
        volume_24h: quote.get("volume_24h").and_then(Value::as_f64),
        percent_change_24h: quote.get("percent_change_24h").and_then(Value::as_f64),
        market_cap: quote.get("market_cap").and_then(Value::as_f64),
        last_updated: quote
            .get("last_updated")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote_body() -> Value {
        json!({
            "price": 0.6123,
            "volume_24h": 1234567.0,
            "percent_change_24h": 2.5,
            "market_cap": 33000000000.0,
            "last_updated": "2024-05-01T12:00:00.000Z"
        })
    }

    #[test]
    fn test_parse_v1_body() {
        let body = json!({ "data": { "XRP": { "symbol": "XRP", "quote": { "USD": quote_body() } } } });
        let data = parse_quote(&body, "XRP", "USD").unwrap();
        assert_eq!(data.price, 0.6123);
        assert_eq!(data.percent_change_24h, Some(2.5));
        assert_eq!(data.last_updated.as_deref(), Some("2024-05-01T12:00:00.000Z"));
    }

    #[test]
    fn test_parse_v2_body() {
        let body = json!({ "data": { "XRP": [{ "symbol": "XRP", "quote": { "EUR": quote_body() } }] } });
        let data = parse_quote(&body, "XRP", "EUR").unwrap();
        assert_eq!(data.convert, "EUR");
        assert_eq!(data.market_cap, Some(33000000000.0));
    }

    #[test]
    fn test_missing_quote() {
        let body = json!({ "data": { "XRP": { "quote": {} } } });
        let err = parse_quote(&body, "XRP", "USD").unwrap_err();
        assert!(err.to_string().contains("quote.USD"));

        let err = parse_quote(&json!({ "data": { "XRP": [] } }), "XRP", "USD").unwrap_err();
        assert!(err.to_string().contains("data.XRP"));
    }

    #[test]
    fn test_requires_api_key() {
        let config = PriceFeedConfig::default();
        assert!(matches!(
            CoinMarketCapSource::from_config(&config),
            Err(PriceError::NoApiKey)
        ));
    }
}
