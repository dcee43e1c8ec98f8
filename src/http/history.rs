use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::http::error::{ApiError, GatewayError, OrApiError};
use crate::http::server::AppState;
use crate::ledger::{LedgerError, Network, TransactionSummary};

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub account: Option<String>,
    /// `testnet` (default) or `mainnet`.
    pub network: Option<String>,
}

/// Recent transactions touching an account.
pub async fn fetch_transactions(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<TransactionSummary>>, ApiError> {
    let summaries = lookup(&state, query)
        .await
        .or_api_error("Failed to fetch transactions")?;
    Ok(Json(summaries))
}

async fn lookup(state: &AppState, query: HistoryQuery) -> Result<Vec<TransactionSummary>, GatewayError> {
    let account = query.account.ok_or(LedgerError::MissingField("account"))?;
    let network = match query.network.as_deref() {
        None | Some("testnet") => Network::Testnet,
        Some("mainnet") => Network::Mainnet,
        Some(other) => {
            return Err(LedgerError::NotAvailable(format!("unknown network '{}'", other)).into())
        }
    };

    let summaries = state.ledger(network).account_transactions(&account).await?;
    tracing::debug!(account = %account, network = %network, count = summaries.len(), "Fetched transactions");
    Ok(summaries)
}
