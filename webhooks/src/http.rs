//! HTTP transport via `reqwest`.

use crate::transport::{TransportError, WebhookTransport};
use std::time::Duration;

/// Default per-delivery timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outbound webhook transport over HTTP POST.
///
/// The timeout bounds each delivery attempt individually, so one stalled
/// verifier endpoint cannot stall the driver's batch.
pub struct HttpTransport {
    /// HTTP client (reusable connection pool).
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default 5-second timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom per-delivery timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookTransport for HttpTransport {
    async fn deliver(&self, url: &str, payload: &serde_json::Value) -> Result<(), TransportError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout
                } else if e.is_connect() {
                    TransportError::Connect(e.to_string())
                } else {
                    TransportError::Other(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
