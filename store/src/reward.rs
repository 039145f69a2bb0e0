//! Reward account and ledger storage.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use vouch_types::{RequestId, Timestamp, UserId};

/// Derived classification of a user by cumulative verifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardTier {
    Bronze,
    Silver,
    Gold,
}

/// Per-user reward totals. Points and verification count never decrease;
/// the tier is always recomputed from the count, never stored on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccount {
    pub user_id: UserId,
    pub points: u64,
    pub total_verifications: u64,
    pub tier: RewardTier,
    pub updated_at: Timestamp,
}

impl RewardAccount {
    /// The zero state used when a user has no account yet.
    pub fn empty(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            points: 0,
            total_verifications: 0,
            tier: RewardTier::Bronze,
            updated_at: now,
        }
    }
}

/// One append-only ledger entry per credited verification.
///
/// The `(user_id, request_id)` pair is unique in the ledger — this, not
/// caller discipline, is what prevents double-reward on retried redemption.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardHistoryEntry {
    pub user_id: UserId,
    pub request_id: RequestId,
    pub points_earned: u64,
    pub timestamp: Timestamp,
}

/// Trait for reward accounts and the reward history ledger.
pub trait RewardStore: Send + Sync {
    fn get_account(&self, user_id: &UserId) -> Result<Option<RewardAccount>, StoreError>;

    fn put_account(&self, account: &RewardAccount) -> Result<(), StoreError>;

    /// Append a ledger entry keyed by `(user_id, request_id)`.
    ///
    /// Returns `false` without writing if an entry for that pair already
    /// exists.
    fn append_history(&self, entry: &RewardHistoryEntry) -> Result<bool, StoreError>;

    /// All ledger entries for a user, in append order.
    fn history_for_user(&self, user_id: &UserId) -> Result<Vec<RewardHistoryEntry>, StoreError>;
}
