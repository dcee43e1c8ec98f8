//! Lenient JSON body extraction.
//!
//! Routes must reach their handler even when the body is missing or not
//! JSON, so a bad body is replaced by `T::default()` instead of rejecting
//! with 4xx. Handlers then fail on the missing fields through the same
//! generic error path as any other failure.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

/// Like `axum::Json`, but never rejects.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientJson<T>(pub T);

impl<S, T> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default + Send,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable request body");
                return Ok(Self(T::default()));
            }
        };

        if bytes.is_empty() {
            return Ok(Self(T::default()));
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Self(value)),
            Err(e) => {
                tracing::debug!(error = %e, "Request body is not the expected JSON");
                Ok(Self(T::default()))
            }
        }
    }
}
