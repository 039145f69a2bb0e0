//! Delivery transport abstraction.
//!
//! The driver is generic over the transport so tests can script outcomes
//! deterministically while the daemon uses the HTTP implementation.

use std::future::Future;
use thiserror::Error;

/// Why a single delivery attempt failed. Every variant is retryable from
/// the driver's point of view — the distinction only matters for logs.
#[derive(Clone, Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Other(String),
}

/// One-shot delivery of a JSON payload to a callback URL.
pub trait WebhookTransport: Send + Sync {
    /// Deliver `payload` to `url`. Success means a 2xx acknowledgement
    /// within the transport's bounded timeout.
    fn deliver(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}
