//! Event broadcast subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler / price feed
//!     → types.rs (GatewayEvent, serialized once)
//!     → hub.rs (fan-out to every registered connection)
//!     → http::websocket (one task per socket drains its receiver)
//! ```

pub mod hub;
pub mod types;

pub use hub::{ConnectionId, EventHub};
pub use types::{AccountBalance, GatewayEvent, TransactionBalances, WalletCreatedData, WalletType};
