//! Market data relay.
//!
//! ```text
//! price API ──(interval)──▶ source.rs ──▶ feed.rs ──▶ EventHub ("xrpData")
//! ```

pub mod feed;
pub mod source;
pub mod types;

pub use feed::PriceFeed;
pub use source::{CoinMarketCapSource, PriceSource};
pub use types::{PriceError, XrpMarketData};
