//! Verification token storage.
//!
//! Only the one-way digest of a token's plaintext code is ever stored.
//! `mark_used` is a conditional single-document update: exactly one of any
//! number of concurrent redemption attempts observes the transition.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use vouch_types::{RequestId, Timestamp, TokenId, UserId, VerifierId};

/// A one-time, time-boxed proof that a consent request was approved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: TokenId,
    /// The owning request (1:1).
    pub request_id: RequestId,
    pub user_id: UserId,
    pub verifier_id: VerifierId,
    /// SHA-256 hex digest of the plaintext code.
    pub token_hash: String,
    pub used: bool,
    pub used_at: Option<Timestamp>,
    /// Set when a redemption attempt observes the TTL elapsed, so later
    /// lookups short-circuit without a clock check.
    pub expired: bool,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl VerificationToken {
    /// Whether the token's TTL has elapsed (flag or clock).
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expired || now >= self.expires_at
    }

    /// The only state in which redemption may succeed.
    pub fn is_live(&self, now: Timestamp) -> bool {
        !self.used && !self.is_expired(now)
    }
}

/// A verification token before the store has assigned its id.
#[derive(Clone, Debug)]
pub struct NewVerificationToken {
    pub request_id: RequestId,
    pub user_id: UserId,
    pub verifier_id: VerifierId,
    pub token_hash: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Trait for storing verification tokens.
pub trait TokenStore: Send + Sync {
    /// Insert a new token with `used = false`, assigning its id.
    fn create_token(&self, new: NewVerificationToken) -> Result<VerificationToken, StoreError>;

    /// Look up an unredeemed token by its digest. Used tokens are excluded
    /// so a consumed code is indistinguishable from an unknown one.
    fn get_token_by_hash(&self, token_hash: &str)
        -> Result<Option<VerificationToken>, StoreError>;

    /// The most recently issued token for a request, used or not.
    fn get_token_for_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<VerificationToken>, StoreError>;

    /// Conditionally transition `used: false -> true`, recording `used_at`.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// token was already used (the loser of a redemption race).
    fn mark_token_used(&self, id: &TokenId, now: Timestamp) -> Result<bool, StoreError>;

    /// Permanently flag a token whose TTL was observed to have elapsed.
    fn mark_token_expired(&self, id: &TokenId) -> Result<(), StoreError>;
}
