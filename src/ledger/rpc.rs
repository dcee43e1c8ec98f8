//! rippled JSON-RPC client with timeout, failover and error handling.
//!
//! # Responsibilities
//! - Speak the `{"method": .., "params": [..]}` JSON-RPC dialect over HTTP
//! - Fail over across configured endpoints in order
//! - Map node error objects (`status: "error"`) to [`LedgerError::Node`]
//! - Implement [`LedgerClient`] on top of the raw methods, keeping key
//!   generation and signing in-process

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use url::Url;

use crate::ledger::client::LedgerClient;
use crate::ledger::codec;
use crate::ledger::history::summarize_account_tx;
use crate::ledger::keys::{generate_seed, Keypair};
use crate::ledger::transaction::PaymentSubmitter;
use crate::ledger::types::{
    Drops, FundedWallet, GeneratedWallet, LedgerError, LedgerResult, Network, NetworkConfig,
    PaymentOutcome, TransactionSummary,
};
use crate::observability::metrics;

/// Node error code for accounts that do not exist (yet).
const ACCOUNT_NOT_FOUND: &str = "actNotFound";

/// Node error code for transactions not found in the node's history.
const TXN_NOT_FOUND: &str = "txnNotFound";

/// rippled client bound to one network.
#[derive(Clone)]
pub struct RippledClient {
    http: reqwest::Client,
    /// Primary endpoint followed by failovers.
    endpoints: Vec<Url>,
    faucet: Option<Url>,
    network: Network,
    config: NetworkConfig,
    timeout_duration: Duration,
}

#[derive(Deserialize)]
struct FaucetResponse {
    account: FaucetAccount,
}

/// The faucet reports the address and seed under more than one name.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaucetAccount {
    classic_address: Option<String>,
    address: Option<String>,
    secret: Option<String>,
    seed: Option<String>,
}

impl FaucetAccount {
    fn into_wallet(self) -> LedgerResult<GeneratedWallet> {
        let address = self
            .classic_address
            .or(self.address)
            .ok_or_else(|| LedgerError::Faucet("response has no account address".to_string()))?;
        let seed = self
            .secret
            .or(self.seed)
            .ok_or_else(|| LedgerError::Faucet("response has no account seed".to_string()))?;
        Ok(GeneratedWallet { address, seed })
    }
}

impl RippledClient {
    /// Create a client for `network`.
    ///
    /// No request is made here; an unreachable node surfaces on first use.
    pub fn new(network: Network, config: NetworkConfig) -> LedgerResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);

        let primary = parse_url("RPC", &config.rpc_url)?;
        let mut endpoints = vec![primary];
        for url_str in &config.failover_urls {
            match Url::parse(url_str) {
                Ok(url) => endpoints.push(url),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let faucet = match &config.faucet_url {
            Some(url) => Some(parse_url("faucet", url)?),
            None => None,
        };

        let http = reqwest::Client::builder()
            .timeout(timeout_duration)
            .build()
            .map_err(|e| LedgerError::Rpc(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            network = %network,
            rpc_url = %config.rpc_url,
            failovers = endpoints.len() - 1,
            faucet = faucet.is_some(),
            "Ledger client initialized"
        );

        Ok(Self {
            http,
            endpoints,
            faucet,
            network,
            config,
            timeout_duration,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Call a public method, trying each endpoint in order.
    pub async fn request(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let body = json!({ "method": method, "params": [params] });

        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match self.post_json(endpoint, &body).await {
                Ok(response) => return into_result(method, response),
                Err(e) => {
                    tracing::warn!(endpoint_idx = i, method, error = %e, "RPC error, trying next endpoint");
                }
            }
        }

        metrics::record_ledger_rpc(method, "unreachable");
        Err(LedgerError::Rpc(format!("All RPC endpoints failed for {}", method)))
    }

    async fn post_json(&self, endpoint: &Url, body: &Value) -> LedgerResult<Value> {
        let fut = async {
            let response = self
                .http
                .post(endpoint.clone())
                .json(body)
                .send()
                .await?
                .error_for_status()?;
            response.json::<Value>().await
        };

        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(LedgerError::Rpc(e.to_string())),
            Err(_) => Err(LedgerError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// `account_info` at the given ledger index ("validated", "current", ...).
    pub async fn account_info(&self, address: &str, ledger_index: &str) -> LedgerResult<Value> {
        self.request(
            "account_info",
            json!({ "account": address, "ledger_index": ledger_index }),
        )
        .await
    }

    /// Next usable Sequence for an account.
    pub async fn next_sequence(&self, address: &str) -> LedgerResult<u64> {
        let info = self.account_info(address, "current").await?;
        u64_at(&info, "/account_data/Sequence")
    }

    /// Fee, in drops, needed to get into the open ledger.
    pub async fn open_ledger_fee(&self) -> LedgerResult<Drops> {
        let fee = self.request("fee", json!({})).await?;
        let drops = fee
            .pointer("/drops/open_ledger_fee")
            .or_else(|| fee.pointer("/drops/base_fee"))
            .and_then(Value::as_str)
            .ok_or_else(|| LedgerError::Malformed("fee response has no drops".to_string()))?;
        Drops::from_drops_str(drops)
    }

    /// Index of the current (open) ledger.
    pub async fn current_ledger_index(&self) -> LedgerResult<u64> {
        let result = self.request("ledger_current", json!({})).await?;
        u64_at(&result, "/ledger_current_index")
    }

    /// Index of the latest validated ledger.
    pub async fn validated_ledger_index(&self) -> LedgerResult<u64> {
        let result = self.request("ledger", json!({ "ledger_index": "validated" })).await?;
        u64_at(&result, "/ledger_index")
    }

    /// Submit a signed blob. Returns `(preliminary engine_result, hash)`.
    pub async fn submit(&self, tx_blob: &str) -> LedgerResult<(String, String)> {
        let result = self.request("submit", json!({ "tx_blob": tx_blob })).await?;
        let engine_result = str_at(&result, "/engine_result")?.to_string();
        let hash = str_at(&result, "/tx_json/hash")?.to_string();
        Ok((engine_result, hash))
    }

    /// Look up a transaction by hash. `None` if the node has not seen it.
    pub async fn transaction(&self, hash: &str) -> LedgerResult<Option<Value>> {
        match self.request("tx", json!({ "transaction": hash })).await {
            Ok(tx) => Ok(Some(tx)),
            Err(LedgerError::Node { code, .. }) if code == TXN_NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Ask the faucet for a new funded account. Returns immediately after the
    /// faucet accepts; funding may not be validated yet.
    pub async fn faucet_create(&self) -> LedgerResult<GeneratedWallet> {
        let faucet = self.faucet.as_ref().ok_or_else(|| {
            LedgerError::NotAvailable(format!("no faucet configured for {}", self.network))
        })?;

        let response = self
            .http
            .post(faucet.clone())
            .json(&json!({}))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LedgerError::Faucet(e.to_string()))?;
        let body: FaucetResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Faucet(format!("unexpected response: {}", e)))?;

        metrics::record_ledger_rpc("faucet", "success");
        body.account.into_wallet()
    }

    /// Poll until `address` exists in a validated ledger, returning its balance.
    async fn wait_for_account(&self, address: &str) -> LedgerResult<Drops> {
        let deadline = Instant::now() + Duration::from_secs(self.config.validation_timeout_secs);
        let poll_interval = Duration::from_millis(self.config.validation_poll_ms);

        loop {
            match self.validated_balance(address).await {
                Ok(balance) => return Ok(balance),
                Err(LedgerError::Node { code, .. }) if code == ACCOUNT_NOT_FOUND => {
                    tracing::debug!(address = %address, "Waiting for faucet funding to validate");
                }
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Err(LedgerError::ValidationTimeout(address.to_string()));
            }
            sleep(poll_interval).await;
        }
    }
}

#[async_trait]
impl LedgerClient for RippledClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn fund_new_wallet(&self) -> LedgerResult<FundedWallet> {
        let wallet = self.faucet_create().await?;
        let balance = self.wait_for_account(&wallet.address).await?;

        tracing::info!(address = %wallet.address, balance = %balance, "Test wallet funded");
        Ok(FundedWallet {
            address: wallet.address,
            seed: wallet.seed,
            balance,
        })
    }

    async fn generate_wallet(&self) -> LedgerResult<GeneratedWallet> {
        let seed = generate_seed();
        let address = Keypair::from_seed(&seed)?.classic_address();
        Ok(GeneratedWallet { address, seed })
    }

    async fn wallet_from_secret(&self, seed: &str) -> LedgerResult<String> {
        Ok(Keypair::from_seed(seed)?.classic_address())
    }

    async fn validated_balance(&self, address: &str) -> LedgerResult<Drops> {
        let info = self.account_info(address, "validated").await?;
        Drops::from_drops_str(str_at(&info, "/account_data/Balance")?)
    }

    async fn autofill_payment(
        &self,
        account: &str,
        destination: &str,
        amount: Drops,
    ) -> LedgerResult<Value> {
        PaymentSubmitter::new(self).autofill(account, destination, amount).await
    }

    async fn submit_signed(
        &self,
        tx_blob: &str,
        last_ledger_sequence: Option<u64>,
    ) -> LedgerResult<PaymentOutcome> {
        PaymentSubmitter::new(self)
            .submit_and_wait(tx_blob, last_ledger_sequence)
            .await
    }

    async fn send_payment(
        &self,
        seed: &str,
        destination: &str,
        amount: Drops,
    ) -> LedgerResult<PaymentOutcome> {
        let keypair = Keypair::from_seed(seed)?;
        let account = keypair.classic_address();
        let submitter = PaymentSubmitter::new(self);
        let mut tx_json = submitter.autofill(&account, destination, amount).await?;
        let signed = codec::sign(&mut tx_json, &keypair)?;

        tracing::debug!(hash = %signed.hash, account = %account, destination = %destination, "Payment signed");
        let last_ledger = tx_json.get("LastLedgerSequence").and_then(Value::as_u64);
        submitter.submit_and_wait(&signed.tx_blob, last_ledger).await
    }

    async fn account_transactions(&self, address: &str) -> LedgerResult<Vec<TransactionSummary>> {
        let result = self
            .request(
                "account_tx",
                json!({
                    "account": address,
                    "ledger_index_min": -1,
                    "ledger_index_max": -1,
                    "limit": self.config.history_limit,
                }),
            )
            .await?;
        summarize_account_tx(&result)
    }
}

impl std::fmt::Debug for RippledClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RippledClient")
            .field("network", &self.network)
            .field("rpc_url", &self.config.rpc_url)
            .field("endpoints", &self.endpoints.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

fn parse_url(kind: &str, value: &str) -> LedgerResult<Url> {
    Url::parse(value).map_err(|e| LedgerError::Rpc(format!("Invalid {} URL '{}': {}", kind, value, e)))
}

/// Unwrap the `result` object, mapping node errors.
fn into_result(method: &str, mut response: Value) -> LedgerResult<Value> {
    let result = response
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| LedgerError::Malformed(format!("{} response has no result", method)))?;

    if result.get("status").and_then(Value::as_str) == Some("error") {
        let code = result
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let message = result
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or(&code)
            .to_string();
        metrics::record_ledger_rpc(method, "error");
        return Err(LedgerError::Node { code, message });
    }

    metrics::record_ledger_rpc(method, "success");
    Ok(result)
}

pub(crate) fn str_at<'a>(value: &'a Value, pointer: &str) -> LedgerResult<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| LedgerError::Malformed(format!("missing string at {}", pointer)))
}

/// rippled reports some indices as numbers and others as strings.
pub(crate) fn u64_at(value: &Value, pointer: &str) -> LedgerResult<u64> {
    let parsed = match value.pointer(pointer) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| LedgerError::Malformed(format!("missing integer at {}", pointer)))
}
