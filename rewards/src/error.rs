use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewardError {
    #[error("store error: {0}")]
    Store(#[from] vouch_store::StoreError),
}
