//! The seam between HTTP handlers and the ledger.
//!
//! Handlers only see [`LedgerClient`]. The production implementation is
//! [`RippledClient`](crate::ledger::rpc::RippledClient); tests substitute
//! in-memory mocks.

use async_trait::async_trait;

use crate::ledger::types::{
    Drops, FundedWallet, GeneratedWallet, LedgerResult, Network, PaymentOutcome, TransactionSummary,
};

/// Operations the gateway needs from a ledger network.
///
/// Sequencing, fees and consensus stay on the node side. Keys are derived
/// and transactions signed in-process.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Network this client is bound to.
    fn network(&self) -> Network;

    /// Create a new account through the network faucet and wait until its
    /// funding shows up in a validated ledger.
    async fn fund_new_wallet(&self) -> LedgerResult<FundedWallet>;

    /// Generate a new key pair. The account does not exist on-ledger until funded.
    async fn generate_wallet(&self) -> LedgerResult<GeneratedWallet>;

    /// Classic address controlled by a seed.
    async fn wallet_from_secret(&self, seed: &str) -> LedgerResult<String>;

    /// Balance of an account in the latest validated ledger.
    async fn validated_balance(&self, address: &str) -> LedgerResult<Drops>;

    /// Prepare a Payment with Sequence, Fee and LastLedgerSequence filled in.
    async fn autofill_payment(
        &self,
        account: &str,
        destination: &str,
        amount: Drops,
    ) -> LedgerResult<serde_json::Value>;

    /// Submit a signed blob and wait until it is validated or its
    /// `LastLedgerSequence` passes.
    async fn submit_signed(
        &self,
        tx_blob: &str,
        last_ledger_sequence: Option<u64>,
    ) -> LedgerResult<PaymentOutcome>;

    /// Autofill, sign with `seed`, submit and wait for validation.
    async fn send_payment(
        &self,
        seed: &str,
        destination: &str,
        amount: Drops,
    ) -> LedgerResult<PaymentOutcome>;

    /// Most recent transactions affecting an account.
    async fn account_transactions(&self, address: &str) -> LedgerResult<Vec<TransactionSummary>>;
}
