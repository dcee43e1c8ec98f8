use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status. `message` is the
    /// `error` field when the body carries one.
    #[error("gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestWallet {
    pub x_address: String,
    pub balance: String,
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealWallet {
    pub x_address: String,
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendXrpResult {
    pub tx_response: Value,
    pub sender_new_balance: String,
    pub recipient_new_balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundResult {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceBalance {
    pub xrp_balance: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSendResult {
    pub success: bool,
    pub hash: String,
    pub result: String,
}

pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// WebSocket URL for the event stream.
    pub fn events_url(&self) -> String {
        let rest = self
            .base_url
            .strip_prefix("https://")
            .map(|r| format!("wss://{}", r))
            .or_else(|| self.base_url.strip_prefix("http://").map(|r| format!("ws://{}", r)))
            .unwrap_or_else(|| self.base_url.clone());
        format!("{}/ws", rest)
    }

    /// Create and fund a test network wallet.
    pub async fn create_test_wallet(&self) -> Result<TestWallet, SdkError> {
        self.send(self.client.post(self.url("/create_test_wallet"))).await
    }

    /// Generate an unfunded main network wallet.
    pub async fn create_real_wallet(&self) -> Result<RealWallet, SdkError> {
        self.send(self.client.post(self.url("/create_real_wallet"))).await
    }

    /// Send `amount` XRP (decimal string) from the wallet holding `sender_secret`.
    pub async fn send_xrp(
        &self,
        sender_secret: &str,
        recipient_address: &str,
        amount: &str,
    ) -> Result<SendXrpResult, SdkError> {
        let body = json!({
            "senderSecret": sender_secret,
            "recipientAddress": recipient_address,
            "amount": amount,
        });
        self.send(self.client.post(self.url("/send_xrp")).json(&body)).await
    }

    pub async fn fetch_transactions(&self, account: &str) -> Result<Vec<TransactionSummary>, SdkError> {
        self.send(
            self.client
                .get(self.url("/fetch_transactions"))
                .query(&[("account", account)]),
        )
        .await
    }

    pub async fn fund_wallet(&self, x_address: &str) -> Result<FundResult, SdkError> {
        self.send(
            self.client
                .post(self.url("/fund_wallet"))
                .query(&[("xAddress", x_address)]),
        )
        .await
    }

    /// Balance of the gateway's hardware wallet.
    pub async fn device_balance(&self) -> Result<DeviceBalance, SdkError> {
        self.send(self.client.get(self.url("/get-ledger-xrp-balance"))).await
    }

    /// Pay from the gateway's hardware wallet.
    pub async fn send_xrp_from_device(
        &self,
        receiver_address: &str,
        amount: &str,
    ) -> Result<DeviceSendResult, SdkError> {
        let body = json!({ "receiverAddress": receiver_address, "amount": amount });
        self.send(self.client.post(self.url("/send-xrp-from-ledger")).json(&body))
            .await
    }

    /// Gateway liveness and open WebSocket count.
    pub async fn health(&self) -> Result<Value, SdkError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SdkError> {
        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(SdkError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
