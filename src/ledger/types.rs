//! Ledger value types and error definitions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::keys::KeyError;

// Re-export NetworkConfig from config module to avoid duplication
pub use crate::config::schema::NetworkConfig;

/// Drops per XRP.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Seconds between the Unix epoch and the Ripple epoch (2000-01-01T00:00:00Z).
pub const RIPPLE_EPOCH_OFFSET: i64 = 946_684_800;

/// Maximum XRP that can ever exist, in drops.
const MAX_DROPS: u64 = 100_000_000_000 * DROPS_PER_XRP;

/// Amount of XRP expressed in drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Drops(pub u64);

impl Drops {
    /// Parse an XRP decimal string ("1", "0.5", "12.000001") into drops.
    pub fn from_xrp_str(xrp: &str) -> LedgerResult<Self> {
        let xrp = xrp.trim();
        let invalid = || LedgerError::InvalidAmount(xrp.to_string());

        let (whole, fraction) = match xrp.split_once('.') {
            Some((w, f)) => (w, f),
            None => (xrp, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 6 {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let fraction: u64 = if fraction.is_empty() {
            0
        } else {
            format!("{:0<6}", fraction).parse().map_err(|_| invalid())?
        };

        let drops = whole
            .checked_mul(DROPS_PER_XRP)
            .and_then(|d| d.checked_add(fraction))
            .filter(|d| *d <= MAX_DROPS)
            .ok_or_else(invalid)?;
        Ok(Self(drops))
    }

    /// Parse an amount given as a JSON string or number of XRP.
    pub fn from_xrp_value(value: &serde_json::Value) -> LedgerResult<Self> {
        match value {
            serde_json::Value::String(s) => Self::from_xrp_str(s),
            serde_json::Value::Number(n) => Self::from_xrp_str(&n.to_string()),
            other => Err(LedgerError::InvalidAmount(other.to_string())),
        }
    }

    /// Parse the drops string rippled reports for native balances.
    pub fn from_drops_str(drops: &str) -> LedgerResult<Self> {
        drops
            .parse()
            .map(Self)
            .map_err(|_| LedgerError::Malformed(format!("invalid drops value '{}'", drops)))
    }

    /// Render as an XRP decimal without trailing zeros.
    pub fn to_xrp_string(&self) -> String {
        let whole = self.0 / DROPS_PER_XRP;
        let fraction = self.0 % DROPS_PER_XRP;
        if fraction == 0 {
            return whole.to_string();
        }
        let fraction = format!("{:06}", fraction);
        format!("{}.{}", whole, fraction.trim_end_matches('0'))
    }
}

impl fmt::Display for Drops {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Drops {
    fn from(drops: u64) -> Self {
        Self(drops)
    }
}

/// Which ledger network a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// A freshly generated, unfunded wallet.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedWallet {
    pub address: String,
    pub seed: String,
}

/// A wallet created and funded by the test network faucet.
#[derive(Clone, PartialEq, Eq)]
pub struct FundedWallet {
    pub address: String,
    pub seed: String,
    /// Validated balance after funding.
    pub balance: Drops,
}

// Seeds must never reach the logs, so Debug is written by hand.
impl fmt::Debug for GeneratedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedWallet")
            .field("address", &self.address)
            .field("seed", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for FundedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FundedWallet")
            .field("address", &self.address)
            .field("seed", &"<redacted>")
            .field("balance", &self.balance)
            .finish()
    }
}

/// Result of a transaction that reached a validated ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    /// Transaction hash.
    pub hash: String,
    /// Sending account.
    pub account: String,
    /// Final `TransactionResult` from the validated metadata.
    pub engine_result: String,
    /// Full `tx` response for the validated transaction.
    pub validated_tx: serde_json::Value,
}

/// One row of an account's transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub amount_transacted: Option<String>,
    pub date: Option<String>,
    pub transaction_fee: String,
    pub result: String,
}

/// Convert seconds since the Ripple epoch into an RFC 3339 timestamp.
pub fn ripple_time_to_rfc3339(ripple_secs: i64) -> Option<String> {
    let unix_secs = ripple_secs.checked_add(RIPPLE_EPOCH_OFFSET)?;
    DateTime::<Utc>::from_timestamp(unix_secs, 0).map(|dt| dt.to_rfc3339())
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The operation is not offered by this network or node.
    #[error("Ledger operation not available: {0}")]
    NotAvailable(String),

    /// The node answered with an error object.
    #[error("Node error {code}: {message}")]
    Node { code: String, message: String },

    /// Autofilled fee exceeded the configured ceiling.
    #[error("Fee {current} drops exceeds maximum {max} drops")]
    FeeTooHigh { current: u64, max: u64 },

    /// Amount could not be converted to drops.
    #[error("Invalid XRP amount: {0}")]
    InvalidAmount(String),

    /// A required request field was absent.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The node rejected the transaction.
    #[error("Transaction rejected: {engine_result}")]
    Rejected { engine_result: String },

    /// Transaction was not validated before its LastLedgerSequence passed.
    #[error("Transaction {0} not validated in time")]
    ValidationTimeout(String),

    /// Seed, key or address could not be used.
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Transaction could not be serialized for signing.
    #[error("Transaction encoding error: {0}")]
    Encoding(String),

    /// Test network faucet failed.
    #[error("Faucet error: {0}")]
    Faucet(String),

    /// Node response did not have the expected shape.
    #[error("Malformed ledger response: {0}")]
    Malformed(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_xrp_to_drops() {
        assert_eq!(Drops::from_xrp_str("1").unwrap(), Drops(1_000_000));
        assert_eq!(Drops::from_xrp_str("0.5").unwrap(), Drops(500_000));
        assert_eq!(Drops::from_xrp_str("12.000001").unwrap(), Drops(12_000_001));
        assert_eq!(Drops::from_xrp_str(".25").unwrap(), Drops(250_000));
        assert_eq!(Drops::from_xrp_str(" 3 ").unwrap(), Drops(3_000_000));
    }

    #[test]
    fn test_invalid_amounts() {
        assert!(Drops::from_xrp_str("").is_err());
        assert!(Drops::from_xrp_str(".").is_err());
        assert!(Drops::from_xrp_str("-1").is_err());
        assert!(Drops::from_xrp_str("1.0000001").is_err());
        assert!(Drops::from_xrp_str("abc").is_err());
        assert!(Drops::from_xrp_str("100000000001").is_err());

        let err = Drops::from_xrp_str("1e5").unwrap_err();
        assert!(err.to_string().contains("Invalid XRP amount"));
    }

    #[test]
    fn test_from_json_value() {
        assert_eq!(Drops::from_xrp_value(&json!(25)).unwrap(), Drops(25_000_000));
        assert_eq!(Drops::from_xrp_value(&json!(0.5)).unwrap(), Drops(500_000));
        assert_eq!(Drops::from_xrp_value(&json!("7")).unwrap(), Drops(7_000_000));
        assert!(Drops::from_xrp_value(&json!(null)).is_err());
        assert!(Drops::from_xrp_value(&json!({"value": "1"})).is_err());
    }

    #[test]
    fn test_drops_to_xrp_string() {
        assert_eq!(Drops(1_000_000).to_xrp_string(), "1");
        assert_eq!(Drops(1_500_000).to_xrp_string(), "1.5");
        assert_eq!(Drops(12).to_xrp_string(), "0.000012");
        assert_eq!(Drops(0).to_xrp_string(), "0");
    }

    #[test]
    fn test_ripple_epoch() {
        assert_eq!(
            ripple_time_to_rfc3339(0).unwrap(),
            "2000-01-01T00:00:00+00:00"
        );
        assert!(ripple_time_to_rfc3339(i64::MAX).is_none());
        assert!(ripple_time_to_rfc3339(i64::MAX - RIPPLE_EPOCH_OFFSET).is_none());
    }

    #[test]
    fn test_seed_redacted_in_debug() {
        let wallet = GeneratedWallet {
            address: "rExample".into(),
            seed: "sEdSecret".into(),
        };
        let debug = format!("{:?}", wallet);
        assert!(debug.contains("rExample"));
        assert!(!debug.contains("sEdSecret"));
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = LedgerError::Rejected {
            engine_result: "tecUNFUNDED_PAYMENT".into(),
        };
        assert!(err.to_string().contains("tecUNFUNDED_PAYMENT"));
    }
}
