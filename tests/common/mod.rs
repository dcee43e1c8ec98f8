//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{routing::post, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use xrpl_gateway::config::{GatewayConfig, NetworkConfig};
use xrpl_gateway::hardware::{HardwareError, HardwareWallet};
use xrpl_gateway::http::{AppState, HttpServer};
use xrpl_gateway::ledger::types::{FundedWallet, GeneratedWallet};
use xrpl_gateway::ledger::{
    Drops, LedgerClient, LedgerError, LedgerResult, Network, PaymentOutcome, TransactionSummary,
};
use xrpl_gateway::lifecycle::Shutdown;

/// Genesis account and its well-known secp256k1 seed.
pub const SENDER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
pub const SENDER_SEED: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";
pub const RECIPIENT: &str = "rLUEXYuLiQptky37CqLcm9USQpPiz5rkpD";
pub const DEVICE: &str = "rDeviceAddressXXXXXXXXXXXXXXXXXXX";
pub const TX_HASH: &str = "E3FE6EA3D48F0C2B639448020EA4F03D4F4F8FFDB243A852A0F59177921B4879";

/// Calls seen by a mock, in order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Ledger client with canned answers.
pub struct MockLedger {
    pub network: Network,
    pub fail: bool,
    pub calls: CallLog,
}

impl MockLedger {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            fail: false,
            calls: CallLog::default(),
        }
    }

    pub fn failing(network: Network) -> Self {
        Self {
            fail: true,
            ..Self::new(network)
        }
    }

    fn record(&self, call: &str) -> LedgerResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.fail {
            return Err(LedgerError::Rpc("All RPC endpoints failed for mock".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn network(&self) -> Network {
        self.network
    }

    async fn fund_new_wallet(&self) -> LedgerResult<FundedWallet> {
        self.record("fund_new_wallet")?;
        Ok(FundedWallet {
            address: "rFundedTestWallet".to_string(),
            seed: "sFundedTestSeed".to_string(),
            balance: Drops(100_000_000),
        })
    }

    async fn generate_wallet(&self) -> LedgerResult<GeneratedWallet> {
        self.record("generate_wallet")?;
        Ok(GeneratedWallet {
            address: "rGeneratedRealWallet".to_string(),
            seed: "sGeneratedRealSeed".to_string(),
        })
    }

    async fn wallet_from_secret(&self, _seed: &str) -> LedgerResult<String> {
        self.record("wallet_from_secret")?;
        Ok(SENDER.to_string())
    }

    async fn validated_balance(&self, address: &str) -> LedgerResult<Drops> {
        self.record(&format!("validated_balance {}", address))?;
        match address {
            SENDER => Ok(Drops(89_999_988)),
            DEVICE => Ok(Drops(25_500_000)),
            _ => Ok(Drops(110_000_000)),
        }
    }

    async fn autofill_payment(
        &self,
        account: &str,
        destination: &str,
        amount: Drops,
    ) -> LedgerResult<Value> {
        self.record("autofill_payment")?;
        Ok(json!({
            "TransactionType": "Payment",
            "Account": account,
            "Destination": destination,
            "Amount": amount.to_string(),
            "Sequence": 7,
            "Fee": "12",
            "LastLedgerSequence": 120,
        }))
    }

    async fn submit_signed(
        &self,
        tx_blob: &str,
        last_ledger_sequence: Option<u64>,
    ) -> LedgerResult<PaymentOutcome> {
        self.record(&format!("submit_signed {} {:?}", tx_blob, last_ledger_sequence))?;
        Ok(outcome(DEVICE))
    }

    async fn send_payment(
        &self,
        _seed: &str,
        destination: &str,
        amount: Drops,
    ) -> LedgerResult<PaymentOutcome> {
        self.record(&format!("send_payment {} {}", destination, amount))?;
        Ok(outcome(SENDER))
    }

    async fn account_transactions(&self, address: &str) -> LedgerResult<Vec<TransactionSummary>> {
        self.record(&format!("account_transactions {}", address))?;
        Ok(vec![TransactionSummary {
            hash: TX_HASH.to_string(),
            from: address.to_string(),
            to: Some(RECIPIENT.to_string()),
            amount_transacted: Some("10".to_string()),
            date: Some("2024-01-01T00:00:00+00:00".to_string()),
            transaction_fee: "0.000012".to_string(),
            result: "tesSUCCESS".to_string(),
        }])
    }
}

fn outcome(account: &str) -> PaymentOutcome {
    PaymentOutcome {
        hash: TX_HASH.to_string(),
        account: account.to_string(),
        engine_result: "tesSUCCESS".to_string(),
        validated_tx: json!({
            "Account": account,
            "hash": TX_HASH,
            "validated": true,
            "meta": { "TransactionResult": "tesSUCCESS" }
        }),
    }
}

/// Hardware wallet that signs everything with a fixed blob.
pub struct MockDevice;

#[async_trait]
impl HardwareWallet for MockDevice {
    async fn address(&self) -> Result<String, HardwareError> {
        Ok(DEVICE.to_string())
    }

    async fn sign_transaction(&self, tx_json: &Value) -> Result<String, HardwareError> {
        if tx_json.get("Account").and_then(Value::as_str) != Some(DEVICE) {
            return Err(HardwareError::Device("wrong account".to_string()));
        }
        Ok("SIGNEDBYDEVICE".to_string())
    }
}

/// Config for tests: no static files, no price feed.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.http.static_dir = None;
    config.price_feed.enabled = false;
    config
}

/// App state over mock ledgers and a mock device.
pub fn mock_state(testnet: MockLedger, mainnet: MockLedger) -> AppState {
    AppState::new(
        Arc::new(testnet),
        Arc::new(mainnet),
        Arc::new(MockDevice),
        Network::Testnet,
    )
}

/// Run a gateway on an ephemeral port. The server stops when the returned
/// `Shutdown` is triggered or dropped.
pub async fn spawn_gateway(state: AppState) -> (SocketAddr, Shutdown) {
    let server = HttpServer::new(test_config(), state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}

/// Start an in-process rippled stand-in.
///
/// `POST /` answers JSON-RPC through `handler(method, params)`, wrapping its
/// value as `{"result": ..}`. `POST /accounts` acts as a faucet.
pub async fn start_mock_rippled<F>(handler: F) -> (SocketAddr, CallLog)
where
    F: Fn(&str, &Value) -> Value + Send + Sync + 'static,
{
    let calls = CallLog::default();
    let handler = Arc::new(handler);

    let log = calls.clone();
    let rpc = move |Json(body): Json<Value>| {
        let handler = handler.clone();
        let log = log.clone();
        async move {
            let method = body["method"].as_str().unwrap_or_default().to_string();
            let params = body["params"][0].clone();
            log.lock().unwrap().push(method.clone());
            Json(json!({ "result": handler(&method, &params) }))
        }
    };

    let app = Router::new().route("/", post(rpc)).route(
        "/accounts",
        post(|| async {
            Json(json!({
                "account": {
                    "xAddress": "T7Faucet",
                    "secret": "sFaucetSeed",
                    "classicAddress": "rFaucetFundedXXXXXXXXXXXXXXXXXXXX",
                    "address": "rFaucetFundedXXXXXXXXXXXXXXXXXXXX"
                },
                "amount": 100,
                "balance": 100
            }))
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, calls)
}

/// A well-behaved node: every payment validates with `tesSUCCESS`.
pub fn healthy_node(method: &str, params: &Value) -> Value {
    match method {
        "wallet_propose" | "sign" => admin_only(),
        "account_info" => {
            let balance = if params["account"] == SENDER { "89999988" } else { "110000000" };
            json!({
                "status": "success",
                "account_data": {
                    "Account": params["account"],
                    "Balance": balance,
                    "Sequence": 7
                }
            })
        }
        "fee" => json!({ "status": "success", "drops": { "base_fee": "10", "open_ledger_fee": "12" } }),
        "ledger_current" => json!({ "status": "success", "ledger_current_index": 100 }),
        "ledger" => json!({ "status": "success", "ledger_index": 100, "validated": true }),
        "submit" => json!({
            "status": "success",
            "engine_result": "tesSUCCESS",
            "tx_json": { "hash": TX_HASH }
        }),
        "tx" => json!({
            "status": "success",
            "Account": SENDER,
            "Destination": RECIPIENT,
            "Amount": "10000000",
            "hash": TX_HASH,
            "ledger_index": 101,
            "validated": true,
            "meta": { "TransactionResult": "tesSUCCESS", "delivered_amount": "10000000" }
        }),
        "account_tx" => json!({
            "status": "success",
            "account": params["account"],
            "transactions": [{
                "tx": {
                    "Account": SENDER,
                    "Destination": RECIPIENT,
                    "Amount": "10000000",
                    "Fee": "12",
                    "date": 757_382_400,
                    "hash": TX_HASH
                },
                "meta": { "TransactionResult": "tesSUCCESS", "delivered_amount": "10000000" },
                "validated": true
            }]
        }),
        other => json!({
            "status": "error",
            "error": "unknownCmd",
            "error_message": format!("Unknown method {}", other)
        }),
    }
}

/// What a public node answers for admin methods.
pub fn admin_only() -> Value {
    json!({
        "status": "error",
        "error": "noPermission",
        "error_message": "You don't have permission for this command."
    })
}

/// Network config pointing at a mock node, with fast polling.
pub fn node_config(addr: SocketAddr) -> NetworkConfig {
    NetworkConfig {
        rpc_url: format!("http://{}/", addr),
        failover_urls: Vec::new(),
        faucet_url: Some(format!("http://{}/accounts", addr)),
        rpc_timeout_secs: 2,
        validation_poll_ms: 10,
        validation_timeout_secs: 2,
        last_ledger_offset: 20,
        max_fee_drops: 2_000_000,
        history_limit: 10,
    }
}
