//! Events pushed to WebSocket clients.

use serde::{Deserialize, Serialize};

use crate::price::types::XrpMarketData;

/// A server-push message. Serialized with a `type` tag, e.g.
/// `{"type":"walletCreated","data":{..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GatewayEvent {
    /// A test or real wallet was created.
    WalletCreated { data: WalletCreatedData },

    /// A payment reached a validated ledger.
    TransactionCompleted {
        balances: TransactionBalances,
        #[serde(rename = "transactionIDs")]
        transaction_ids: String,
    },

    /// Latest market data.
    XrpData { data: XrpMarketData },
}

impl GatewayEvent {
    /// Wire name of the event, used for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            GatewayEvent::WalletCreated { .. } => "walletCreated",
            GatewayEvent::TransactionCompleted { .. } => "transactionCompleted",
            GatewayEvent::XrpData { .. } => "xrpData",
        }
    }
}

/// Kind of wallet announced by `walletCreated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Test,
    Real,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreatedData {
    pub x_address: String,
    /// Only test wallets start with a balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    pub secret: String,
    pub wallet_type: WalletType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionBalances {
    pub sender: AccountBalance,
    pub recipient: AccountBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub address: String,
    /// Validated balance in drops.
    pub new_balance: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wallet_created_shape() {
        let event = GatewayEvent::WalletCreated {
            data: WalletCreatedData {
                x_address: "rTest".into(),
                balance: Some("100000000".into()),
                secret: "sSeed".into(),
                wallet_type: WalletType::Test,
            },
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "walletCreated",
                "data": {
                    "xAddress": "rTest",
                    "balance": "100000000",
                    "secret": "sSeed",
                    "walletType": "test"
                }
            })
        );
    }

    #[test]
    fn test_real_wallet_omits_balance() {
        let event = GatewayEvent::WalletCreated {
            data: WalletCreatedData {
                x_address: "rReal".into(),
                balance: None,
                secret: "sSeed".into(),
                wallet_type: WalletType::Real,
            },
        };
        let value = serde_json::to_value(&event).unwrap();
        assert!(value["data"].get("balance").is_none());
        assert_eq!(value["data"]["walletType"], "real");
    }

    #[test]
    fn test_transaction_completed_shape() {
        let event = GatewayEvent::TransactionCompleted {
            balances: TransactionBalances {
                sender: AccountBalance {
                    address: "rA".into(),
                    new_balance: "90".into(),
                },
                recipient: AccountBalance {
                    address: "rB".into(),
                    new_balance: "110".into(),
                },
            },
            transaction_ids: "HASH".into(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "transactionCompleted");
        assert_eq!(value["balances"]["sender"]["newBalance"], "90");
        assert_eq!(value["balances"]["recipient"]["address"], "rB");
        assert_eq!(value["transactionIDs"], "HASH");
        assert_eq!(event.name(), "transactionCompleted");
    }

    #[test]
    fn test_xrp_data_shape() {
        let event = GatewayEvent::XrpData {
            data: XrpMarketData {
                symbol: "XRP".into(),
                convert: "USD".into(),
                price: 0.52,
                volume_24h: Some(1.0e9),
                percent_change_24h: Some(-1.5),
                market_cap: None,
                last_updated: None,
            },
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "xrpData");
        assert_eq!(value["data"]["price"], 0.52);
        assert_eq!(value["data"]["percentChange24h"], -1.5);
        assert!(value["data"]["marketCap"].is_null());
    }
}
