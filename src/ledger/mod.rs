//! XRP Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → client.rs (LedgerClient trait, one instance per network)
//!     → rpc.rs (rippled JSON-RPC with timeouts and failover)
//!     → keys.rs + codec.rs (seeds, addresses, local signing)
//!     → transaction.rs (autofill, submit, wait for validation)
//!     → history.rs (account_tx → history rows)
//! ```
//!
//! # Security Constraints
//! - Seeds stay in-process and are never logged
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod codec;
pub mod history;
pub mod keys;
pub mod rpc;
pub mod transaction;
pub mod types;

pub use client::LedgerClient;
pub use rpc::RippledClient;
pub use types::{Drops, LedgerError, LedgerResult, Network, PaymentOutcome, TransactionSummary};
