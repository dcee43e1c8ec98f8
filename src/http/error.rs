//! Handler-boundary error mapping.
//!
//! Every failure becomes HTTP 500 with a route-specific generic message.
//! The underlying cause is logged, never returned to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::hardware::HardwareError;
use crate::ledger::LedgerError;

/// Anything a handler can fail with.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Hardware(#[from] HardwareError),
}

/// A failure rendered as `500 {"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    cause: GatewayError,
}

impl ApiError {
    pub fn new(message: &'static str, cause: impl Into<GatewayError>) -> Self {
        Self {
            message,
            cause: cause.into(),
        }
    }

    /// The generic message sent to the client.
    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn cause(&self) -> &GatewayError {
        &self.cause
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.cause, "{}", self.message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Attach a route's generic message to a fallible result.
pub trait OrApiError<T> {
    fn or_api_error(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T, E: Into<GatewayError>> OrApiError<T> for Result<T, E> {
    fn or_api_error(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(message, e))
    }
}
