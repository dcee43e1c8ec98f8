//! Flattening `account_tx` responses into history rows.

use serde_json::Value;

use crate::ledger::types::{ripple_time_to_rfc3339, Drops, LedgerError, LedgerResult, TransactionSummary};

/// Summarize every entry of an `account_tx` result.
///
/// Handles both API v1 (`tx` with embedded hash) and v2 (`tx_json` with
/// top-level `hash`). Entries without a hash or account are skipped.
pub fn summarize_account_tx(result: &Value) -> LedgerResult<Vec<TransactionSummary>> {
    let entries = result
        .get("transactions")
        .and_then(Value::as_array)
        .ok_or_else(|| LedgerError::Malformed("account_tx result has no transactions".to_string()))?;

    Ok(entries.iter().filter_map(summarize_entry).collect())
}

fn summarize_entry(entry: &Value) -> Option<TransactionSummary> {
    let tx = entry.get("tx_json").or_else(|| entry.get("tx"))?;
    let meta = entry.get("meta");

    let hash = entry
        .get("hash")
        .or_else(|| tx.get("hash"))
        .and_then(Value::as_str)?
        .to_string();
    let from = tx.get("Account").and_then(Value::as_str)?.to_string();
    let to = tx.get("Destination").and_then(Value::as_str).map(str::to_string);

    // delivered_amount is what actually arrived; Amount/DeliverMax is the request.
    let amount_transacted = meta
        .and_then(|m| m.get("delivered_amount"))
        .or_else(|| tx.get("DeliverMax"))
        .or_else(|| tx.get("Amount"))
        .and_then(format_amount);

    let date = tx
        .get("date")
        .and_then(Value::as_i64)
        .and_then(ripple_time_to_rfc3339)
        .or_else(|| entry.get("close_time_iso").and_then(Value::as_str).map(str::to_string));

    let transaction_fee = tx
        .get("Fee")
        .and_then(Value::as_str)
        .and_then(|fee| Drops::from_drops_str(fee).ok())
        .map(|fee| fee.to_xrp_string())
        .unwrap_or_else(|| "0".to_string());

    let result = meta
        .and_then(|m| m.get("TransactionResult"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    Some(TransactionSummary {
        hash,
        from,
        to,
        amount_transacted,
        date,
        transaction_fee,
        result,
    })
}

/// XRP amounts arrive as drop strings, issued currencies as objects.
fn format_amount(amount: &Value) -> Option<String> {
    match amount {
        Value::String(drops) => Drops::from_drops_str(drops).ok().map(|d| d.to_xrp_string()),
        Value::Object(issued) => {
            let value = issued.get("value")?.as_str()?;
            let currency = issued.get("currency")?.as_str()?;
            Some(format!("{} {}", value, currency))
        }
        _ => None,
    }
}
