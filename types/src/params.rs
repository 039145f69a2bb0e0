//! Service parameters — every tunable constant of the protocol in one place.
//!
//! Defaults match the deployed service. Tests override individual fields
//! with struct-update syntax.

use serde::{Deserialize, Serialize};

/// All tunable parameters of the verification service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceParams {
    // ── Consent requests ─────────────────────────────────────────────────
    /// Lifetime (seconds) of a pending consent request before it expires.
    pub request_ttl_secs: u64,

    // ── Verification tokens ──────────────────────────────────────────────
    /// Lifetime (seconds) of an issued verification token. Default: 5 minutes.
    pub token_ttl_secs: u64,

    // ── Rewards ──────────────────────────────────────────────────────────
    /// Points credited per completed verification.
    pub points_per_verification: u64,

    /// Verification count at which a user reaches the silver tier.
    pub silver_threshold: u64,

    /// Verification count at which a user reaches the gold tier.
    pub gold_threshold: u64,

    // ── Webhook delivery ─────────────────────────────────────────────────
    /// Attempts after which a webhook event is terminally failed.
    pub webhook_max_attempts: u32,

    /// Maximum pending events processed per driver invocation.
    pub webhook_batch_size: usize,

    /// Base retry delay unit in seconds. The delay after the Nth failure is
    /// `N * base * 2^N`, preserving the deployed backoff curve (2, 16, 72,
    /// 256 minutes for attempts 1..4).
    pub webhook_base_delay_secs: u64,

    /// Per-event outbound HTTP timeout in seconds.
    pub webhook_timeout_secs: u64,
}

impl ServiceParams {
    /// The deployed service configuration.
    pub fn vouch_defaults() -> Self {
        Self {
            request_ttl_secs: 10 * 60,
            token_ttl_secs: 5 * 60,

            points_per_verification: 10,
            silver_threshold: 10,
            gold_threshold: 20,

            webhook_max_attempts: 5,
            webhook_batch_size: 20,
            webhook_base_delay_secs: 60,
            webhook_timeout_secs: 5,
        }
    }
}

impl Default for ServiceParams {
    fn default() -> Self {
        Self::vouch_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let p = ServiceParams::default();
        assert_eq!(p.token_ttl_secs, 300);
        assert_eq!(p.request_ttl_secs, 600);
        assert_eq!(p.points_per_verification, 10);
        assert_eq!(p.webhook_max_attempts, 5);
        assert_eq!(p.webhook_batch_size, 20);
    }
}
