//! Client for the XRP Ledger wallet gateway HTTP API.

pub mod client;

pub use client::{
    DeviceBalance, DeviceSendResult, FundResult, GatewayClient, RealWallet, SdkError, SendXrpResult,
    TestWallet, TransactionSummary,
};
