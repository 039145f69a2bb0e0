use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("unknown verifier: {0}")]
    UnknownVerifier(String),

    #[error("payload serialization failed: {0}")]
    Serialization(String),

    #[error("store error: {0}")]
    Store(#[from] vouch_store::StoreError),
}
