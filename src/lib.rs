//! XRP Ledger wallet gateway.
//!
//! Exposes wallet creation, payments, account history and hardware-wallet
//! routes over HTTP, and pushes wallet, payment and market events to every
//! open WebSocket.

// Core subsystems
pub mod config;
pub mod http;
pub mod ledger;

// Event distribution
pub mod events;
pub mod price;

// Signing devices
pub mod hardware;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
