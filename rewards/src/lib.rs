//! Reward ledger for the VOUCH protocol.
//!
//! Credits users for completed verifications: fixed points per event, a
//! monotonic verification counter, and a tier derived from that counter.
//! Idempotence is enforced by the ledger itself — the `(user, request)`
//! pair is unique in the append-only history, so a retried redemption can
//! never double-credit.

pub mod error;
pub mod ledger;

pub use error::RewardError;
pub use ledger::{tier_for, AccrualOutcome, RewardLedger};
