//! Axum-based RPC server.

use crate::error::RpcError;
use crate::handlers::{self, AppState};
use axum::routing::post;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use vouch_webhooks::WebhookTransport;

/// Build the full route table over a shared state.
pub fn router<T: WebhookTransport + 'static>(state: Arc<AppState<T>>) -> Router {
    Router::new()
        .route("/api/kyc/request", post(handlers::submit_request::<T>))
        .route("/api/kyc/verify", post(handlers::verify_token::<T>))
        .route("/api/kyc/approve", post(handlers::approve_request::<T>))
        .route("/api/kyc/deny", post(handlers::deny_request::<T>))
        .route(
            "/api/admin/verifier-status",
            post(handlers::update_verifier_status::<T>),
        )
        .route("/internal/webhooks/run", post(handlers::run_webhooks::<T>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve<T: WebhookTransport + 'static>(
    addr: SocketAddr,
    state: Arc<AppState<T>>,
) -> Result<(), RpcError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "rpc server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
