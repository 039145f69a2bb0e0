//! Webhook outbox storage.
//!
//! Events are never deleted — the outbox doubles as the delivery audit
//! trail. Status transitions are conditional on the event still being
//! pending, which gives overlapping driver runs at-most-one-winner
//! semantics without external locking.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use vouch_types::{EventId, RequestId, Timestamp, VerifierId};

/// Delivery status of a webhook event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Awaiting delivery (or retry).
    Pending,
    /// Acknowledged by the verifier. Terminal.
    Success,
    /// Retry budget exhausted. Terminal.
    Failed,
}

/// One notification obligation toward a verifier.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: EventId,
    pub verifier_id: VerifierId,
    /// The request this event notifies about; carried for saga-replay
    /// deduplication and in the payload for verifier-side deduplication.
    pub request_id: RequestId,
    /// Callback URL captured at enqueue time, not re-resolved on retry.
    pub callback_url: String,
    /// Opaque JSON body POSTed to the callback URL.
    pub payload: serde_json::Value,
    pub status: EventStatus,
    /// Failed delivery attempts so far. Only increases.
    pub attempts: u32,
    /// Meaningful only while `status` is pending.
    pub next_retry_at: Timestamp,
    pub created_at: Timestamp,
}

/// A webhook event before the store has assigned its id.
#[derive(Clone, Debug)]
pub struct NewWebhookEvent {
    pub verifier_id: VerifierId,
    pub request_id: RequestId,
    pub callback_url: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

/// Trait for the webhook outbox.
pub trait WebhookStore: Send + Sync {
    /// Insert a new event with `status = pending`, `attempts = 0` and
    /// `next_retry_at = created_at` (eligible immediately).
    fn create_event(&self, new: NewWebhookEvent) -> Result<WebhookEvent, StoreError>;

    /// Point read by id.
    fn get_event(&self, id: &EventId) -> Result<Option<WebhookEvent>, StoreError>;

    /// Whether any event (of any status) exists for the given request.
    /// Used by the approval saga to avoid enqueueing duplicates on replay.
    fn event_exists_for_request(&self, request_id: &RequestId) -> Result<bool, StoreError>;

    /// Pending events with `next_retry_at <= now`, oldest-eligible-first,
    /// at most `limit`.
    fn due_events(&self, now: Timestamp, limit: usize) -> Result<Vec<WebhookEvent>, StoreError>;

    /// Conditionally transition `pending -> success`.
    ///
    /// Returns `false` if the event was no longer pending (another driver
    /// run won the race, or the event already reached a terminal state).
    fn mark_event_delivered(&self, id: &EventId) -> Result<bool, StoreError>;

    /// Conditionally record a failed attempt on a pending event.
    ///
    /// `next_retry_at = Some(t)` reschedules the event; `None` transitions
    /// it to the terminal failed state. Returns `false` if the event was no
    /// longer pending.
    fn record_event_failure(
        &self,
        id: &EventId,
        attempts: u32,
        next_retry_at: Option<Timestamp>,
    ) -> Result<bool, StoreError>;
}
