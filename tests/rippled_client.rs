//! RippledClient against an in-process JSON-RPC node.

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use xrpl_gateway::http::AppState;
use xrpl_gateway::ledger::{Drops, LedgerClient, LedgerError, Network, RippledClient};

mod common;
use common::{healthy_node, node_config, RECIPIENT, SENDER, SENDER_SEED, TX_HASH};

/// Genesis account's compressed public key.
const SENDER_PUBLIC_KEY: &str = "0330E7FC9D56BB25D6893BA3F317AE5BCF33B3291BD63DB32654A313222F7FD020";

#[tokio::test]
async fn test_send_payment_flow() {
    let submitted = Arc::new(Mutex::new(None));
    let seen = submitted.clone();
    let (addr, calls) = common::start_mock_rippled(move |method: &str, params: &Value| {
        if method == "submit" {
            *seen.lock().unwrap() = params["tx_blob"].as_str().map(str::to_string);
        }
        healthy_node(method, params)
    })
    .await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let outcome = client
        .send_payment(SENDER_SEED, RECIPIENT, Drops(10_000_000))
        .await
        .unwrap();
    assert_eq!(outcome.hash, TX_HASH);
    assert_eq!(outcome.account, SENDER);
    assert_eq!(outcome.engine_result, "tesSUCCESS");
    assert_eq!(outcome.validated_tx["validated"], true);

    assert_eq!(
        calls.lock().unwrap().as_slice(),
        ["account_info", "fee", "ledger_current", "submit", "tx"]
    );

    // Sequence 7, LastLedgerSequence 120, 10 XRP, 12 drops fee, then the key.
    let blob = submitted.lock().unwrap().clone().unwrap();
    assert!(blob.starts_with(
        "1200002400000007201B0000007861400000000098968068400000000000000C7321"
    ));
    assert!(blob.contains(SENDER_PUBLIC_KEY));
    assert!(!blob.contains(&hex_of(SENDER_SEED)));
}

fn hex_of(text: &str) -> String {
    text.bytes().map(|b| format!("{:02X}", b)).collect()
}

#[tokio::test]
async fn test_public_node_without_admin_methods() {
    let (addr, calls) = common::start_mock_rippled(healthy_node).await;
    assert_eq!(healthy_node("wallet_propose", &json!({}))["error"], "noPermission");
    let client = RippledClient::new(Network::Mainnet, node_config(addr)).unwrap();

    let wallet = client.generate_wallet().await.unwrap();
    assert!(wallet.seed.starts_with("sEd"));
    assert!(wallet.address.starts_with('r'));
    assert_eq!(client.wallet_from_secret(&wallet.seed).await.unwrap(), wallet.address);

    client
        .send_payment(SENDER_SEED, RECIPIENT, Drops(1_000_000))
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert!(!calls.iter().any(|m| m == "wallet_propose" || m == "sign"));
}

#[tokio::test]
async fn test_invalid_seed_never_reaches_node() {
    let (addr, calls) = common::start_mock_rippled(healthy_node).await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let err = client
        .send_payment("sNotARealSeed", RECIPIENT, Drops(1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Key(_)));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_autofill_payment() {
    let (addr, _) = common::start_mock_rippled(healthy_node).await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let tx = client
        .autofill_payment(SENDER, RECIPIENT, Drops(2_500_000))
        .await
        .unwrap();
    assert_eq!(
        tx,
        json!({
            "TransactionType": "Payment",
            "Account": SENDER,
            "Destination": RECIPIENT,
            "Amount": "2500000",
            "Sequence": 7,
            "Fee": "12",
            "LastLedgerSequence": 120,
        })
    );
}

#[tokio::test]
async fn test_fee_ceiling() {
    let (addr, _) = common::start_mock_rippled(healthy_node).await;
    let mut config = node_config(addr);
    config.max_fee_drops = 10;
    let client = RippledClient::new(Network::Testnet, config).unwrap();

    let err = client
        .autofill_payment(SENDER, RECIPIENT, Drops(1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::FeeTooHigh { current: 12, max: 10 }));
}

#[tokio::test]
async fn test_claimed_fee_result_is_failure() {
    let (addr, _) = common::start_mock_rippled(|method: &str, params: &Value| match method {
        "submit" => json!({
            "status": "success",
            "engine_result": "tecUNFUNDED_PAYMENT",
            "tx_json": { "hash": TX_HASH }
        }),
        "tx" => json!({
            "status": "success",
            "Account": SENDER,
            "hash": TX_HASH,
            "ledger_index": 101,
            "validated": true,
            "meta": { "TransactionResult": "tecUNFUNDED_PAYMENT" }
        }),
        _ => healthy_node(method, params),
    })
    .await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let err = client.submit_signed("BLOB", None).await.unwrap_err();
    match err {
        LedgerError::Rejected { engine_result } => assert_eq!(engine_result, "tecUNFUNDED_PAYMENT"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_transaction_rejected_without_polling() {
    let (addr, calls) = common::start_mock_rippled(|method: &str, params: &Value| match method {
        "submit" => json!({
            "status": "success",
            "engine_result": "temBAD_AMOUNT",
            "tx_json": { "hash": TX_HASH }
        }),
        _ => healthy_node(method, params),
    })
    .await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let err = client.submit_signed("BLOB", None).await.unwrap_err();
    assert!(matches!(err, LedgerError::Rejected { .. }));
    assert!(!calls.lock().unwrap().contains(&"tx".to_string()));
}

#[tokio::test]
async fn test_expired_transaction() {
    let (addr, _) = common::start_mock_rippled(|method: &str, params: &Value| match method {
        "tx" => json!({ "status": "error", "error": "txnNotFound", "error_message": "Transaction not found." }),
        "ledger" => json!({ "status": "success", "ledger_index": 500 }),
        _ => healthy_node(method, params),
    })
    .await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let err = client
        .send_payment(SENDER_SEED, RECIPIENT, Drops(1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ValidationTimeout(hash) if hash == TX_HASH));
}

#[tokio::test]
async fn test_presigned_blob_expires_at_last_ledger() {
    let (addr, _) = common::start_mock_rippled(|method: &str, params: &Value| match method {
        "tx" => json!({ "status": "error", "error": "txnNotFound", "error_message": "Transaction not found." }),
        "ledger" => json!({ "status": "success", "ledger_index": 500 }),
        _ => healthy_node(method, params),
    })
    .await;
    let mut config = node_config(addr);
    config.validation_timeout_secs = 30;
    let client = RippledClient::new(Network::Testnet, config).unwrap();

    let started = tokio::time::Instant::now();
    let err = client.submit_signed("BLOB", Some(120)).await.unwrap_err();
    assert!(matches!(err, LedgerError::ValidationTimeout(_)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_failover_to_second_endpoint() {
    let (addr, calls) = common::start_mock_rippled(healthy_node).await;
    let mut config = node_config(addr);
    config.rpc_url = "http://127.0.0.1:1/".to_string();
    config.failover_urls = vec![format!("http://{}/", addr)];
    let client = RippledClient::new(Network::Mainnet, config).unwrap();

    let balance = client.validated_balance(SENDER).await.unwrap();
    assert_eq!(balance, Drops(89_999_988));
    assert_eq!(calls.lock().unwrap().as_slice(), ["account_info"]);
}

#[tokio::test]
async fn test_node_error_surfaces() {
    let (addr, _) = common::start_mock_rippled(|method: &str, params: &Value| match method {
        "account_info" => json!({
            "status": "error",
            "error": "actMalformed",
            "error_message": "Account malformed."
        }),
        _ => healthy_node(method, params),
    })
    .await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    match client.validated_balance("bogus").await.unwrap_err() {
        LedgerError::Node { code, .. } => assert_eq!(code, "actMalformed"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_fund_new_wallet_waits_for_account() {
    let polls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let seen = polls.clone();
    let (addr, _) = common::start_mock_rippled(move |method: &str, params: &Value| {
        if method == "account_info" && seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst) < 2 {
            return json!({ "status": "error", "error": "actNotFound", "error_message": "Account not found." });
        }
        healthy_node(method, params)
    })
    .await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let wallet = client.fund_new_wallet().await.unwrap();
    assert_eq!(wallet.address, "rFaucetFundedXXXXXXXXXXXXXXXXXXXX");
    assert_eq!(wallet.seed, "sFaucetSeed");
    assert_eq!(wallet.balance, Drops(110_000_000));
    assert_eq!(polls.load(std::sync::atomic::Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_derive_known_wallets() {
    let (addr, calls) = common::start_mock_rippled(healthy_node).await;
    let client = RippledClient::new(Network::Mainnet, node_config(addr)).unwrap();

    assert_eq!(client.wallet_from_secret(SENDER_SEED).await.unwrap(), SENDER);
    assert_eq!(
        client.wallet_from_secret("sEdSKaCy2JT7JaM7v95H9SxkhP9wS2r").await.unwrap(),
        RECIPIENT
    );
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_account_transactions() {
    let (addr, _) = common::start_mock_rippled(healthy_node).await;
    let client = RippledClient::new(Network::Testnet, node_config(addr)).unwrap();

    let rows = client.account_transactions(SENDER).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hash, TX_HASH);
    assert_eq!(rows[0].to.as_deref(), Some(RECIPIENT));
    assert_eq!(rows[0].amount_transacted.as_deref(), Some("10"));
    assert_eq!(rows[0].transaction_fee, "0.000012");
    assert_eq!(rows[0].result, "tesSUCCESS");
    assert!(rows[0].date.as_deref().unwrap().starts_with("2024-01-01"));
}

#[tokio::test]
async fn test_gateway_over_unreachable_node_returns_500() {
    let mut config = common::test_config();
    config.testnet.rpc_url = "http://127.0.0.1:1/".to_string();
    config.testnet.faucet_url = Some("http://127.0.0.1:1/accounts".to_string());
    config.testnet.rpc_timeout_secs = 1;
    let state = AppState::from_config(&config).unwrap();
    let (addr, _shutdown) = common::spawn_gateway(state).await;

    let res = reqwest::Client::new()
        .get(format!("http://{}/fetch_transactions?account={}", addr, SENDER))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to fetch transactions" }));
}
