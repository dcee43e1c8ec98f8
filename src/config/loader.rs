//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding the listener port.
pub const PORT_ENV_VAR: &str = "PORT";

/// Environment variable carrying the price API key.
pub const PRICE_API_KEY_ENV_VAR: &str = "PRICE_API_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value '{0}'")]
    Port(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load the effective configuration: file (or defaults), then environment
/// overrides, then validation.
pub fn load(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    let port = std::env::var(PORT_ENV_VAR).ok();
    let api_key = std::env::var(PRICE_API_KEY_ENV_VAR).ok();
    let config = config.with_overrides(port.as_deref(), api_key.as_deref())?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

impl GatewayConfig {
    /// Apply `PORT` and `PRICE_API_KEY` style overrides.
    ///
    /// The port replaces only the port half of the bind address.
    pub fn with_overrides(
        mut self,
        port: Option<&str>,
        price_api_key: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = port {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Port(port.to_string()))?;
            let host = self
                .listener
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            self.listener.bind_address = format!("{}:{}", host, port);
        }

        if let Some(key) = price_api_key.filter(|k| !k.trim().is_empty()) {
            self.price_feed.api_key = Some(key.trim().to_string());
        }

        Ok(self)
    }
}
