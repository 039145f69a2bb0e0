//! Nullable webhook transport — scripted delivery outcomes.

use std::collections::VecDeque;
use std::sync::Mutex;
use vouch_webhooks::{TransportError, WebhookTransport};

/// A webhook transport whose outcomes come from a script instead of a
/// socket. Every attempted delivery is recorded for inspection.
pub struct NullTransport {
    script: Mutex<VecDeque<Result<(), TransportError>>>,
    fallback: Result<(), TransportError>,
    deliveries: Mutex<Vec<(String, serde_json::Value)>>,
}

impl NullTransport {
    /// Every delivery succeeds.
    pub fn succeeding() -> Self {
        Self::with_fallback(Ok(()))
    }

    /// Every delivery times out.
    pub fn failing() -> Self {
        Self::with_fallback(Err(TransportError::Timeout))
    }

    /// Outcomes are consumed from `script` in order; once exhausted,
    /// deliveries succeed.
    pub fn scripted(script: Vec<Result<(), TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Ok(()),
            deliveries: Mutex::new(Vec::new()),
        }
    }

    fn with_fallback(fallback: Result<(), TransportError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            deliveries: Mutex::new(Vec::new()),
        }
    }

    /// Every `(url, payload)` pair attempted so far, in order.
    pub fn deliveries(&self) -> Vec<(String, serde_json::Value)> {
        self.deliveries
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl WebhookTransport for NullTransport {
    async fn deliver(&self, url: &str, payload: &serde_json::Value) -> Result<(), TransportError> {
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.push((url.to_string(), payload.clone()));
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}
