use thiserror::Error;
use vouch_store::StoreError;

/// Errors surfaced by the consent and verification engines.
///
/// `InvalidToken` deliberately covers unknown, consumed and race-lost
/// tokens alike: a caller probing codes learns nothing about which case
/// it hit.
#[derive(Debug, Error)]
pub enum KycError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid or already used token")]
    InvalidToken,

    #[error("token has expired")]
    Expired,

    #[error("token was issued to a different verifier")]
    VerifierMismatch,

    #[error("transient dependency failure: {0}")]
    Transient(String),

    #[error("internal error: {0}")]
    Fatal(String),
}

impl From<StoreError> for KycError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => KycError::NotFound(key),
            StoreError::Duplicate(key) => KycError::InvalidArgument(format!("duplicate: {key}")),
            StoreError::Backend(msg) => KycError::Transient(msg),
            StoreError::Serialization(msg) => KycError::Fatal(msg),
        }
    }
}

impl From<vouch_rewards::RewardError> for KycError {
    fn from(e: vouch_rewards::RewardError) -> Self {
        match e {
            vouch_rewards::RewardError::Store(e) => e.into(),
        }
    }
}

impl From<vouch_webhooks::WebhookError> for KycError {
    fn from(e: vouch_webhooks::WebhookError) -> Self {
        match e {
            vouch_webhooks::WebhookError::UnknownVerifier(id) => {
                KycError::NotFound(format!("verifier {id}"))
            }
            vouch_webhooks::WebhookError::Serialization(msg) => KycError::Fatal(msg),
            vouch_webhooks::WebhookError::Store(e) => e.into(),
        }
    }
}
