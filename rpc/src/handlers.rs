//! RPC request handlers.

use crate::auth::{bearer_token, CallerIdentity, IdentityProvider};
use crate::error::ApiError;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use vouch_kyc::{KycEngine, KycError, VerifierRegistry};
use vouch_store::VerifierStatus;
use vouch_types::{RequestId, Timestamp, UserId, VerifierId};
use vouch_webhooks::{DeliveryDriver, DriverStats, WebhookTransport};

/// Shared handler state: the engines plus the identity seam.
pub struct AppState<T: WebhookTransport> {
    pub engine: KycEngine,
    pub registry: VerifierRegistry,
    pub identity: Arc<dyn IdentityProvider>,
    pub driver: DeliveryDriver<T>,
}

fn authenticate_user<T: WebhookTransport>(
    state: &AppState<T>,
    headers: &HeaderMap,
) -> Result<CallerIdentity, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| KycError::Unauthenticated("missing bearer token".to_string()))?;
    state
        .identity
        .resolve(token)
        .ok_or_else(|| KycError::Unauthenticated("invalid bearer token".to_string()).into())
}

/// First hop of `X-Forwarded-For`, when a proxy supplied one.
fn source_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(|ip| ip.trim().to_string())
}

// ── Verifier: submit a consent request ───────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub api_key: String,
    pub user_id: String,
    pub requested_fields: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub request_id: RequestId,
}

pub async fn submit_request<T: WebhookTransport>(
    State(state): State<Arc<AppState<T>>>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let verifier = state.registry.authenticate(&req.api_key)?;
    let request_id = state.engine.submit(
        &verifier,
        &UserId::new(req.user_id),
        req.requested_fields,
        Timestamp::now(),
    )?;
    Ok(Json(SubmitResponse { request_id }))
}

// ── Verifier: redeem a token ─────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub api_key: String,
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub verified: bool,
    pub user_id: UserId,
    pub request_id: RequestId,
    pub profile: BTreeMap<String, String>,
}

pub async fn verify_token<T: WebhookTransport>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let verifier = state.registry.authenticate(&req.api_key)?;
    let redemption = state.engine.redeem(
        &verifier,
        &req.token,
        source_ip(&headers),
        Timestamp::now(),
    )?;
    Ok(Json(VerifyResponse {
        verified: true,
        user_id: redemption.user_id,
        request_id: redemption.request_id,
        profile: redemption.verified_fields,
    }))
}

// ── User: approve / deny ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub request_id: RequestId,
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    /// The token plaintext; shown exactly once.
    pub token: String,
}

pub async fn approve_request<T: WebhookTransport>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse>, ApiError> {
    let caller = authenticate_user(&state, &headers)?;
    let token = state
        .engine
        .approve(&req.request_id, &caller.user_id, Timestamp::now())?;
    Ok(Json(ApproveResponse { token }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenyRequest {
    pub request_id: RequestId,
}

#[derive(Serialize)]
pub struct DenyResponse {
    pub success: bool,
}

pub async fn deny_request<T: WebhookTransport>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
    Json(req): Json<DenyRequest>,
) -> Result<Json<DenyResponse>, ApiError> {
    let caller = authenticate_user(&state, &headers)?;
    state
        .engine
        .deny(&req.request_id, &caller.user_id, Timestamp::now())?;
    Ok(Json(DenyResponse { success: true }))
}

// ── Admin: verifier status ───────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierStatusRequest {
    pub verifier_id: VerifierId,
    pub status: VerifierStatus,
}

#[derive(Debug, Serialize)]
pub struct VerifierStatusResponse {
    pub success: bool,
}

pub async fn update_verifier_status<T: WebhookTransport>(
    State(state): State<Arc<AppState<T>>>,
    headers: HeaderMap,
    Json(req): Json<VerifierStatusRequest>,
) -> Result<Json<VerifierStatusResponse>, ApiError> {
    let caller = authenticate_user(&state, &headers)?;
    if !caller.admin {
        return Err(KycError::PermissionDenied("admin only".to_string()).into());
    }
    state.registry.set_status(
        &req.verifier_id,
        req.status,
        &caller.user_id,
        Timestamp::now(),
    )?;
    Ok(Json(VerifierStatusResponse { success: true }))
}

// ── Internal: scheduled webhook driver ───────────────────────────────────

pub async fn run_webhooks<T: WebhookTransport>(
    State(state): State<Arc<AppState<T>>>,
) -> Result<Json<DriverStats>, ApiError> {
    let stats = state
        .driver
        .run_once(Timestamp::now())
        .await
        .map_err(KycError::from)?;
    Ok(Json(stats))
}
