//! Verifier authentication and administration.

use crate::error::KycError;
use std::sync::Arc;
use vouch_crypto::sha256_hex;
use vouch_store::{AdminAuditEntry, AuditStore, CredentialStore, VerifierRecord, VerifierStatus};
use vouch_types::{Timestamp, UserId, VerifierId};

pub struct VerifierRegistry {
    verifiers: Arc<dyn CredentialStore>,
    audit: Arc<dyn AuditStore>,
}

impl VerifierRegistry {
    pub fn new(verifiers: Arc<dyn CredentialStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self { verifiers, audit }
    }

    /// Resolve an API key to its verifier. The key is hashed and compared
    /// against stored digests; suspended verifiers are rejected with the
    /// same error an unknown key gets.
    pub fn authenticate(&self, api_key: &str) -> Result<VerifierRecord, KycError> {
        let record = self
            .verifiers
            .find_verifier_by_key_hash(&sha256_hex(api_key))?
            .ok_or_else(|| KycError::Unauthenticated("unknown API key".to_string()))?;

        if !record.is_active() {
            tracing::warn!(verifier = %record.id, "suspended verifier attempted access");
            return Err(KycError::Unauthenticated("unknown API key".to_string()));
        }

        Ok(record)
    }

    /// Suspend or reactivate a verifier. Admin-only at the RPC layer; every
    /// change lands in the admin audit log.
    pub fn set_status(
        &self,
        verifier_id: &VerifierId,
        status: VerifierStatus,
        actor: &UserId,
        now: Timestamp,
    ) -> Result<(), KycError> {
        if self.verifiers.get_verifier(verifier_id)?.is_none() {
            return Err(KycError::NotFound(format!("verifier {verifier_id}")));
        }

        self.verifiers.set_verifier_status(verifier_id, status)?;
        self.audit.append_admin(&AdminAuditEntry {
            actor: actor.clone(),
            action: "VERIFIER_STATUS_CHANGED".to_string(),
            details: format!("verifier {verifier_id} set to {status:?}"),
            timestamp: now,
        })?;

        tracing::info!(verifier = %verifier_id, status = ?status, admin = %actor, "verifier status changed");
        Ok(())
    }
}
