//! Reward accrual over the account and history stores.

use crate::error::RewardError;
use std::sync::Arc;
use vouch_store::{RewardAccount, RewardHistoryEntry, RewardStore, RewardTier};
use vouch_types::{RequestId, ServiceParams, Timestamp, UserId};

/// Result of an accrual call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccrualOutcome {
    /// Points were credited and one ledger entry appended.
    Credited { account: RewardAccount },
    /// The `(user, request)` pair was already in the ledger — nothing changed.
    AlreadyCredited,
}

/// Compute the tier for a cumulative verification count.
pub fn tier_for(total_verifications: u64, params: &ServiceParams) -> RewardTier {
    if total_verifications >= params.gold_threshold {
        RewardTier::Gold
    } else if total_verifications >= params.silver_threshold {
        RewardTier::Silver
    } else {
        RewardTier::Bronze
    }
}

/// The reward ledger engine.
pub struct RewardLedger {
    rewards: Arc<dyn RewardStore>,
    params: ServiceParams,
}

impl RewardLedger {
    pub fn new(rewards: Arc<dyn RewardStore>, params: ServiceParams) -> Self {
        Self { rewards, params }
    }

    /// Credit a user for one completed verification.
    ///
    /// The history append is the idempotence gate and happens first: a
    /// duplicate `(user, request)` pair returns `AlreadyCredited` without
    /// touching the account, so a retried redemption converges instead of
    /// double-crediting. A crash between the append and the account write
    /// leaves an under-credited account, never an over-credited one; the
    /// ledger entry makes the gap visible to reconciliation.
    pub fn accrue(
        &self,
        user_id: &UserId,
        request_id: &RequestId,
        now: Timestamp,
    ) -> Result<AccrualOutcome, RewardError> {
        let entry = RewardHistoryEntry {
            user_id: user_id.clone(),
            request_id: request_id.clone(),
            points_earned: self.params.points_per_verification,
            timestamp: now,
        };

        if !self.rewards.append_history(&entry)? {
            tracing::debug!(
                user = %user_id,
                request = %request_id,
                "reward already credited for this redemption"
            );
            return Ok(AccrualOutcome::AlreadyCredited);
        }

        let mut account = self
            .rewards
            .get_account(user_id)?
            .unwrap_or_else(|| RewardAccount::empty(user_id.clone(), now));

        account.points += self.params.points_per_verification;
        account.total_verifications += 1;
        account.tier = tier_for(account.total_verifications, &self.params);
        account.updated_at = now;

        self.rewards.put_account(&account)?;

        tracing::info!(
            user = %user_id,
            request = %request_id,
            points = account.points,
            tier = ?account.tier,
            "credited verification reward"
        );

        Ok(AccrualOutcome::Credited { account })
    }

    /// Current account state for a user (zero state if absent).
    pub fn account(&self, user_id: &UserId, now: Timestamp) -> Result<RewardAccount, RewardError> {
        Ok(self
            .rewards
            .get_account(user_id)?
            .unwrap_or_else(|| RewardAccount::empty(user_id.clone(), now)))
    }
}
