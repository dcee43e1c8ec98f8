use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::events::{GatewayEvent, WalletCreatedData, WalletType};
use crate::http::error::{ApiError, OrApiError};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestWalletResponse {
    pub x_address: String,
    pub balance: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealWalletResponse {
    pub x_address: String,
    pub secret: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FundWalletQuery {
    #[serde(rename = "xAddress")]
    pub x_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FundWalletResponse {
    pub success: bool,
    pub message: String,
}

/// Create and fund a wallet from the test network faucet.
pub async fn create_test_wallet(
    State(state): State<AppState>,
) -> Result<Json<TestWalletResponse>, ApiError> {
    let wallet = state
        .testnet
        .fund_new_wallet()
        .await
        .or_api_error("Failed to create wallet")?;

    let balance = wallet.balance.to_string();
    state.events.broadcast(&GatewayEvent::WalletCreated {
        data: WalletCreatedData {
            x_address: wallet.address.clone(),
            balance: Some(balance.clone()),
            secret: wallet.seed.clone(),
            wallet_type: WalletType::Test,
        },
    });

    tracing::info!(address = %wallet.address, balance = %balance, "Test wallet created");
    Ok(Json(TestWalletResponse {
        x_address: wallet.address,
        balance,
        secret: wallet.seed,
    }))
}

/// Generate an unfunded main network wallet.
pub async fn create_real_wallet(
    State(state): State<AppState>,
) -> Result<Json<RealWalletResponse>, ApiError> {
    let wallet = state
        .mainnet
        .generate_wallet()
        .await
        .or_api_error("Failed to create real wallet")?;

    state.events.broadcast(&GatewayEvent::WalletCreated {
        data: WalletCreatedData {
            x_address: wallet.address.clone(),
            balance: None,
            secret: wallet.seed.clone(),
            wallet_type: WalletType::Real,
        },
    });

    tracing::info!(address = %wallet.address, "Real wallet generated");
    Ok(Json(RealWalletResponse {
        x_address: wallet.address,
        secret: wallet.seed,
    }))
}

/// Acknowledge a funding request. Nothing is sent to the ledger.
pub async fn fund_wallet(Query(query): Query<FundWalletQuery>) -> Json<FundWalletResponse> {
    let address = query.x_address.as_deref().unwrap_or("unknown");
    tracing::info!(address = %address, "Funding wallet");

    Json(FundWalletResponse {
        success: true,
        message: format!("Wallet {} funded successfully.", address),
    })
}
