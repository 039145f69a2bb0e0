//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use vouch_kyc::KycError;

/// Errors from running the server itself (not from handling a request).
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("bind error: {0}")]
    Io(#[from] std::io::Error),
}

/// A `KycError` leaving the service as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub KycError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            KycError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            KycError::InvalidToken | KycError::Expired => StatusCode::BAD_REQUEST,
            KycError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            KycError::PermissionDenied(_) | KycError::VerifierMismatch => StatusCode::FORBIDDEN,
            KycError::NotFound(_) => StatusCode::NOT_FOUND,
            KycError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
            KycError::Fatal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<KycError> for ApiError {
    fn from(e: KycError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (KycError::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
            (KycError::InvalidToken, StatusCode::BAD_REQUEST),
            (KycError::Expired, StatusCode::BAD_REQUEST),
            (KycError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (KycError::PermissionDenied("x".into()), StatusCode::FORBIDDEN),
            (KycError::VerifierMismatch, StatusCode::FORBIDDEN),
            (KycError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (KycError::Transient("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (KycError::Fatal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError(error).status(), expected);
        }
    }
}
