//! Routes backed by the hardware wallet.
//!
//! The device holds the key, so payments are autofilled by the node, signed
//! on the device and submitted as a blob.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::body::LenientJson;
use crate::http::error::{ApiError, GatewayError, OrApiError};
use crate::http::server::AppState;
use crate::ledger::{Drops, LedgerError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceBalanceResponse {
    pub xrp_balance: String,
    pub address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSendRequest {
    pub receiver_address: Option<String>,
    pub amount: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct DeviceSendResponse {
    pub success: bool,
    pub hash: String,
    pub result: String,
}

pub async fn get_ledger_xrp_balance(
    State(state): State<AppState>,
) -> Result<Json<DeviceBalanceResponse>, ApiError> {
    let response = balance(&state)
        .await
        .or_api_error("Failed to get ledger balance")?;
    Ok(Json(response))
}

async fn balance(state: &AppState) -> Result<DeviceBalanceResponse, GatewayError> {
    let address = state.hardware.address().await?;
    let drops = state
        .ledger(state.hardware_network)
        .validated_balance(&address)
        .await?;

    Ok(DeviceBalanceResponse {
        xrp_balance: drops.to_xrp_string(),
        address,
    })
}

pub async fn send_xrp_from_ledger(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<DeviceSendRequest>,
) -> Result<Json<DeviceSendResponse>, ApiError> {
    let response = send(&state, request)
        .await
        .or_api_error("Failed to send XRP from ledger")?;
    Ok(Json(response))
}

async fn send(state: &AppState, request: DeviceSendRequest) -> Result<DeviceSendResponse, GatewayError> {
    let receiver = request
        .receiver_address
        .ok_or(LedgerError::MissingField("receiverAddress"))?;
    let amount = request.amount.ok_or(LedgerError::MissingField("amount"))?;
    let amount = Drops::from_xrp_value(&amount)?;

    let ledger = state.ledger(state.hardware_network);
    let address = state.hardware.address().await?;
    let tx_json = ledger.autofill_payment(&address, &receiver, amount).await?;
    let blob = state.hardware.sign_transaction(&tx_json).await?;
    let last_ledger = tx_json.get("LastLedgerSequence").and_then(Value::as_u64);
    let outcome = ledger.submit_signed(&blob, last_ledger).await?;

    tracing::info!(
        hash = %outcome.hash,
        from = %address,
        to = %receiver,
        amount = %amount,
        result = %outcome.engine_result,
        "Device payment validated"
    );

    Ok(DeviceSendResponse {
        success: true,
        hash: outcome.hash,
        result: outcome.engine_result,
    })
}
