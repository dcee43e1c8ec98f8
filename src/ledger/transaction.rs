//! Payment preparation, submission and validation monitoring.
//!
//! # Responsibilities
//! - Autofill Sequence, Fee and LastLedgerSequence from the node
//! - Submit signed blobs
//! - Poll until the transaction is in a validated ledger or expired

use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::ledger::rpc::{str_at, RippledClient};
use crate::ledger::types::{Drops, LedgerError, LedgerResult, PaymentOutcome};

/// Preliminary results that mean the transaction may still make it into a
/// validated ledger.
fn may_validate(engine_result: &str) -> bool {
    engine_result.starts_with("tes") || engine_result.starts_with("tec") || engine_result == "terQUEUED"
}

/// Where a submitted transaction stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Not yet in a validated ledger.
    Pending,
    /// In a validated ledger with the given result.
    Validated { ledger_index: u64, result: String },
    /// LastLedgerSequence has passed without validation.
    Expired,
}

/// Drives a Payment from JSON to validated outcome.
pub struct PaymentSubmitter<'a> {
    client: &'a RippledClient,
}

impl<'a> PaymentSubmitter<'a> {
    /// Create a new submitter.
    pub fn new(client: &'a RippledClient) -> Self {
        Self { client }
    }

    /// Build a Payment with Sequence, Fee and LastLedgerSequence.
    pub async fn autofill(&self, account: &str, destination: &str, amount: Drops) -> LedgerResult<Value> {
        let config = self.client.config();

        let sequence = self.client.next_sequence(account).await?;
        let fee = self.client.open_ledger_fee().await?;
        if fee.0 > config.max_fee_drops {
            return Err(LedgerError::FeeTooHigh {
                current: fee.0,
                max: config.max_fee_drops,
            });
        }
        let current = self.client.current_ledger_index().await?;
        let last_ledger_sequence = current + config.last_ledger_offset as u64;

        let tx = json!({
            "TransactionType": "Payment",
            "Account": account,
            "Destination": destination,
            "Amount": amount.to_string(),
            "Sequence": sequence,
            "Fee": fee.to_string(),
            "LastLedgerSequence": last_ledger_sequence,
        });

        tracing::debug!(
            account = %account,
            sequence,
            fee = %fee,
            last_ledger_sequence,
            "Payment autofilled"
        );
        Ok(tx)
    }

    /// Submit a signed blob and wait for the validated result.
    ///
    /// `last_ledger_sequence` bounds the wait when known; otherwise only the
    /// configured validation timeout applies.
    pub async fn submit_and_wait(
        &self,
        tx_blob: &str,
        last_ledger_sequence: Option<u64>,
    ) -> LedgerResult<PaymentOutcome> {
        let (engine_result, hash) = self.client.submit(tx_blob).await?;
        tracing::info!(hash = %hash, engine_result = %engine_result, "Transaction submitted");

        if !may_validate(&engine_result) {
            return Err(LedgerError::Rejected { engine_result });
        }

        let validated_tx = self.wait_for_validation(&hash, last_ledger_sequence).await?;
        let result = str_at(&validated_tx, "/meta/TransactionResult")?.to_string();
        if result != "tesSUCCESS" {
            return Err(LedgerError::Rejected { engine_result: result });
        }

        let account = str_at(&validated_tx, "/Account")
            .or_else(|_| str_at(&validated_tx, "/tx_json/Account"))?
            .to_string();

        Ok(PaymentOutcome {
            hash,
            account,
            engine_result: result,
            validated_tx,
        })
    }

    /// Check once where a transaction stands.
    pub async fn status(&self, hash: &str, last_ledger_sequence: Option<u64>) -> LedgerResult<(ValidationStatus, Option<Value>)> {
        if let Some(tx) = self.client.transaction(hash).await? {
            if tx.get("validated").and_then(Value::as_bool) == Some(true) {
                let ledger_index = tx.get("ledger_index").and_then(Value::as_u64).unwrap_or_default();
                let result = str_at(&tx, "/meta/TransactionResult")?.to_string();
                return Ok((ValidationStatus::Validated { ledger_index, result }, Some(tx)));
            }
        }

        if let Some(last) = last_ledger_sequence {
            let validated = self.client.validated_ledger_index().await?;
            if validated > last {
                return Ok((ValidationStatus::Expired, None));
            }
        }

        Ok((ValidationStatus::Pending, None))
    }

    /// Poll until the transaction is validated.
    pub async fn wait_for_validation(
        &self,
        hash: &str,
        last_ledger_sequence: Option<u64>,
    ) -> LedgerResult<Value> {
        let config = self.client.config();
        let timeout_duration = Duration::from_secs(config.validation_timeout_secs);
        let poll_interval = Duration::from_millis(config.validation_poll_ms);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.status(hash, last_ledger_sequence).await? {
                    (ValidationStatus::Validated { ledger_index, result }, Some(tx)) => {
                        tracing::info!(hash = %hash, ledger_index, result = %result, "Transaction validated");
                        return Ok(tx);
                    }
                    (ValidationStatus::Expired, _) => {
                        return Err(LedgerError::ValidationTimeout(hash.to_string()));
                    }
                    _ => {
                        tracing::debug!(hash = %hash, "Transaction pending");
                    }
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(LedgerError::ValidationTimeout(hash.to_string())),
        }
    }
}
