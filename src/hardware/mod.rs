//! Hardware wallet seam.
//!
//! The device owns the key; the gateway only asks it for its address and
//! for signatures over autofilled transactions. No device transport ships
//! with the gateway, so the default is [`DisconnectedDevice`].

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a hardware wallet backend.
#[derive(Debug, Error)]
pub enum HardwareError {
    /// No device is attached or no backend is configured.
    #[error("Hardware wallet not connected")]
    NotConnected,

    /// The user declined the request on the device.
    #[error("Request rejected on device")]
    Rejected,

    /// Transport or firmware failure.
    #[error("Device error: {0}")]
    Device(String),
}

/// A signer whose key never leaves the device.
#[async_trait]
pub trait HardwareWallet: Send + Sync {
    /// Classic address of the device's account.
    async fn address(&self) -> Result<String, HardwareError>;

    /// Sign an autofilled transaction, returning the hex blob.
    async fn sign_transaction(&self, tx_json: &serde_json::Value) -> Result<String, HardwareError>;
}

/// Backend used when no device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisconnectedDevice;

#[async_trait]
impl HardwareWallet for DisconnectedDevice {
    async fn address(&self) -> Result<String, HardwareError> {
        Err(HardwareError::NotConnected)
    }

    async fn sign_transaction(&self, _tx_json: &serde_json::Value) -> Result<String, HardwareError> {
        Err(HardwareError::NotConnected)
    }
}
