//! HTTP API surface.
//!
//! Three audiences share one router: verifiers (API-key authenticated
//! submit and verify), users (bearer-token approve and deny) and
//! operators (admin verifier management plus the scheduled webhook
//! driver trigger).

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;

pub use auth::{CallerIdentity, IdentityProvider, StaticTokens};
pub use error::{ApiError, RpcError};
pub use handlers::AppState;
pub use server::{router, serve};
