//! Verifier credential storage (consumed, not designed here).
//!
//! The credential store holds each verifier's hashed API key, callback URL
//! and active/suspended status. This core reads it to authenticate inbound
//! calls and resolve callback URLs, and writes only the status field (an
//! administrative operation).

use crate::StoreError;
use serde::{Deserialize, Serialize};
use vouch_types::VerifierId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierStatus {
    Active,
    Suspended,
}

/// A registered third-party verifier platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifierRecord {
    pub id: VerifierId,
    pub name: String,
    /// SHA-256 hex digest of the verifier's API key. The key itself is
    /// never stored.
    pub api_key_hash: String,
    /// Where approval notifications are POSTed.
    pub callback_url: String,
    pub status: VerifierStatus,
}

impl VerifierRecord {
    pub fn is_active(&self) -> bool {
        self.status == VerifierStatus::Active
    }
}

/// Trait for the verifier credential store.
pub trait CredentialStore: Send + Sync {
    fn get_verifier(&self, id: &VerifierId) -> Result<Option<VerifierRecord>, StoreError>;

    /// Look up a verifier by the digest of a presented API key.
    fn find_verifier_by_key_hash(
        &self,
        api_key_hash: &str,
    ) -> Result<Option<VerifierRecord>, StoreError>;

    fn put_verifier(&self, record: &VerifierRecord) -> Result<(), StoreError>;

    fn set_verifier_status(
        &self,
        id: &VerifierId,
        status: VerifierStatus,
    ) -> Result<(), StoreError>;
}
