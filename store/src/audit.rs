//! Append-only audit logs.
//!
//! Nothing in this core mutates or deletes an audit record once written.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use vouch_types::{RequestId, Timestamp, UserId, VerifierId};

/// Audit record written on every successful redemption.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    pub user_id: UserId,
    pub verifier_id: VerifierId,
    pub request_id: RequestId,
    pub verified_fields: Vec<String>,
    pub timestamp: Timestamp,
    pub source_ip: Option<String>,
}

/// Audit record for administrative actions (verifier status changes).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminAuditEntry {
    /// The admin user who performed the action.
    pub actor: UserId,
    pub action: String,
    pub details: String,
    pub timestamp: Timestamp,
}

/// Trait for the append-only audit logs.
pub trait AuditStore: Send + Sync {
    fn append_verification(&self, entry: &VerificationLogEntry) -> Result<(), StoreError>;

    /// Most recent verification records first, at most `limit`.
    fn recent_verifications(&self, limit: usize)
        -> Result<Vec<VerificationLogEntry>, StoreError>;

    fn append_admin(&self, entry: &AdminAuditEntry) -> Result<(), StoreError>;
}
