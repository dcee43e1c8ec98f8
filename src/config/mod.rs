//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml (optional)
//!     → loader.rs (parse & deserialize, PORT / PRICE_API_KEY overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → cloned into subsystems at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the gateway runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, ConfigError};
pub use schema::{
    GatewayConfig, HardwareConfig, HttpConfig, ListenerConfig, NetworkConfig, ObservabilityConfig,
    PriceFeedConfig,
};
pub use validation::{validate_config, ValidationError};
