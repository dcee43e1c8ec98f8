//! HTTP and WebSocket surface.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → server.rs (router, middleware)
//!     → body.rs (lenient JSON) / query extraction
//!     → wallet.rs | payment.rs | history.rs | device.rs
//!         → ledger client / hardware wallet
//!         → EventHub broadcast
//!     → error.rs (any failure → 500 {"error"})
//!
//! WebSocket client
//!     → websocket.rs (register with EventHub, push events)
//! ```

pub mod body;
pub mod device;
pub mod error;
pub mod history;
pub mod payment;
pub mod request;
pub mod server;
pub mod wallet;
pub mod websocket;

pub use error::{ApiError, GatewayError};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
