//! Webhook enqueueing.

use crate::error::WebhookError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vouch_store::{CredentialStore, NewWebhookEvent, WebhookEvent, WebhookStore};
use vouch_types::{RequestId, Timestamp, VerifierId};

/// The JSON body POSTed to a verifier when a request is approved.
///
/// `request_id` is the stable identifier a verifier deduplicates on under
/// at-least-once delivery.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalNotice {
    pub request_id: RequestId,
    pub status: String,
    pub timestamp: u64,
}

impl ApprovalNotice {
    pub fn approved(request_id: RequestId, now: Timestamp) -> Self {
        Self {
            request_id,
            status: "approved".to_string(),
            timestamp: now.as_secs(),
        }
    }
}

/// Enqueues notification obligations into the outbox.
pub struct Outbox {
    events: Arc<dyn WebhookStore>,
    verifiers: Arc<dyn CredentialStore>,
}

impl Outbox {
    pub fn new(events: Arc<dyn WebhookStore>, verifiers: Arc<dyn CredentialStore>) -> Self {
        Self { events, verifiers }
    }

    /// Create a pending event for an approval, eligible for delivery
    /// immediately. The verifier's callback URL is resolved once, here;
    /// retries use the captured URL.
    pub fn enqueue_approval(
        &self,
        verifier_id: &VerifierId,
        request_id: &RequestId,
        now: Timestamp,
    ) -> Result<WebhookEvent, WebhookError> {
        let verifier = self
            .verifiers
            .get_verifier(verifier_id)?
            .ok_or_else(|| WebhookError::UnknownVerifier(verifier_id.to_string()))?;

        let notice = ApprovalNotice::approved(request_id.clone(), now);
        let payload = serde_json::to_value(&notice)
            .map_err(|e| WebhookError::Serialization(e.to_string()))?;

        let event = self.events.create_event(NewWebhookEvent {
            verifier_id: verifier_id.clone(),
            request_id: request_id.clone(),
            callback_url: verifier.callback_url,
            payload,
            created_at: now,
        })?;

        tracing::debug!(
            event = %event.id,
            verifier = %verifier_id,
            request = %request_id,
            "enqueued approval webhook"
        );

        Ok(event)
    }

    /// Whether an event already exists for a request (saga-replay check).
    pub fn has_event_for_request(&self, request_id: &RequestId) -> Result<bool, WebhookError> {
        Ok(self.events.event_exists_for_request(request_id)?)
    }
}
