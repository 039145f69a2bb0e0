//! Consent request storage.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use vouch_types::{RequestId, Timestamp, UserId, VerifierId};

/// Lifecycle status of a consent request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting the user's decision.
    Pending,
    /// User granted consent; a token has been minted.
    Approved,
    /// User declined.
    Denied,
}

/// A verifier's standing request for a user's consent to share fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KycRequest {
    pub id: RequestId,
    pub user_id: UserId,
    pub verifier_id: VerifierId,
    /// Ordered, non-empty list of requested field names as the verifier
    /// submitted them (mapping to profile attributes happens at redemption).
    pub requested_fields: Vec<String>,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl KycRequest {
    /// Whether the request window has closed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// A consent request before the store has assigned its id.
#[derive(Clone, Debug)]
pub struct NewKycRequest {
    pub user_id: UserId,
    pub verifier_id: VerifierId,
    pub requested_fields: Vec<String>,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Trait for storing consent requests.
pub trait RequestStore: Send + Sync {
    /// Insert a new request, assigning its id.
    fn create_request(&self, new: NewKycRequest) -> Result<KycRequest, StoreError>;

    /// Point read by id.
    fn get_request(&self, id: &RequestId) -> Result<Option<KycRequest>, StoreError>;

    /// Overwrite the status field of an existing request.
    fn set_request_status(&self, id: &RequestId, status: RequestStatus) -> Result<(), StoreError>;
}
