use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::{AccountBalance, GatewayEvent, TransactionBalances};
use crate::http::body::LenientJson;
use crate::http::error::{ApiError, GatewayError, OrApiError};
use crate::http::server::AppState;
use crate::ledger::{Drops, LedgerError};

/// Body of `POST /send_xrp`. Not `Debug`: carries a seed.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendXrpRequest {
    pub sender_secret: Option<String>,
    pub recipient_address: Option<String>,
    pub amount: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendXrpResponse {
    pub tx_response: Value,
    pub sender_new_balance: String,
    pub recipient_new_balance: String,
}

/// Pay XRP from a seed-held test wallet and report both validated balances.
pub async fn send_xrp(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<SendXrpRequest>,
) -> Result<Json<SendXrpResponse>, ApiError> {
    let response = execute(&state, request).await.or_api_error("Failed to send XRP")?;
    Ok(Json(response))
}

async fn execute(state: &AppState, request: SendXrpRequest) -> Result<SendXrpResponse, GatewayError> {
    let seed = request
        .sender_secret
        .ok_or(LedgerError::MissingField("senderSecret"))?;
    let recipient = request
        .recipient_address
        .ok_or(LedgerError::MissingField("recipientAddress"))?;
    let amount = request.amount.ok_or(LedgerError::MissingField("amount"))?;
    let amount = Drops::from_xrp_value(&amount)?;

    let ledger = &state.testnet;
    let outcome = ledger.send_payment(&seed, &recipient, amount).await?;

    let sender_balance = ledger.validated_balance(&outcome.account).await?;
    let recipient_balance = ledger.validated_balance(&recipient).await?;

    let delivered = state.events.broadcast(&GatewayEvent::TransactionCompleted {
        balances: TransactionBalances {
            sender: AccountBalance {
                address: outcome.account.clone(),
                new_balance: sender_balance.to_string(),
            },
            recipient: AccountBalance {
                address: recipient.clone(),
                new_balance: recipient_balance.to_string(),
            },
        },
        transaction_ids: outcome.hash.clone(),
    });

    tracing::info!(
        hash = %outcome.hash,
        from = %outcome.account,
        to = %recipient,
        amount = %amount,
        notified = delivered,
        "Payment validated"
    );

    Ok(SendXrpResponse {
        tx_response: outcome.validated_tx,
        sender_new_balance: sender_balance.to_string(),
        recipient_new_balance: recipient_balance.to_string(),
    })
}
