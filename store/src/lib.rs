//! Abstract storage traits for the VOUCH protocol.
//!
//! The production backend is an external transactional document store with
//! point reads, field-filtered queries, and atomic single-document
//! read-modify-write. Every backend (the in-memory store for testing and
//! development included) implements these traits; the rest of the codebase
//! depends only on the traits.
//!
//! Conditional updates (`mark_used`, `mark_delivered`, `record_failure`,
//! `append_history`) are the serialization points of the protocol — they
//! succeed for at most one caller racing on the same document.

pub mod audit;
pub mod credential;
pub mod error;
pub mod profile;
pub mod request;
pub mod reward;
pub mod token;
pub mod webhook;

pub use audit::{AdminAuditEntry, AuditStore, VerificationLogEntry};
pub use credential::{CredentialStore, VerifierRecord, VerifierStatus};
pub use error::StoreError;
pub use profile::{ProfileStore, UserProfile};
pub use request::{KycRequest, NewKycRequest, RequestStatus, RequestStore};
pub use reward::{RewardAccount, RewardHistoryEntry, RewardStore, RewardTier};
pub use token::{NewVerificationToken, TokenStore, VerificationToken};
pub use webhook::{EventStatus, NewWebhookEvent, WebhookEvent, WebhookStore};
