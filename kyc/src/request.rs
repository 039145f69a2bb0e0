//! Consent request lifecycle: submit and deny.
//!
//! Approval lives in the orchestrator (`engine`) because it spans the
//! token store and the webhook outbox.

use crate::error::KycError;
use std::sync::Arc;
use vouch_store::{KycRequest, NewKycRequest, RequestStatus, RequestStore, VerifierRecord};
use vouch_types::{RequestId, ServiceParams, Timestamp, UserId};

pub struct RequestEngine {
    requests: Arc<dyn RequestStore>,
    params: ServiceParams,
}

impl RequestEngine {
    pub fn new(requests: Arc<dyn RequestStore>, params: ServiceParams) -> Self {
        Self { requests, params }
    }

    /// Open a pending consent request on behalf of an authenticated
    /// verifier. The request window closes after `request_ttl_secs`.
    pub fn submit(
        &self,
        verifier: &VerifierRecord,
        user_id: &UserId,
        requested_fields: Vec<String>,
        now: Timestamp,
    ) -> Result<KycRequest, KycError> {
        if requested_fields.is_empty() {
            return Err(KycError::InvalidArgument(
                "requested_fields must not be empty".to_string(),
            ));
        }
        if requested_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(KycError::InvalidArgument(
                "requested_fields must not contain blank names".to_string(),
            ));
        }

        let request = self.requests.create_request(NewKycRequest {
            user_id: user_id.clone(),
            verifier_id: verifier.id.clone(),
            requested_fields,
            status: RequestStatus::Pending,
            created_at: now,
            expires_at: now.plus_secs(self.params.request_ttl_secs),
        })?;

        tracing::info!(
            request = %request.id,
            verifier = %verifier.id,
            user = %user_id,
            "consent request submitted"
        );

        Ok(request)
    }

    /// Decline a pending request. Only the request's subject may deny it.
    /// Denying an already denied request is a no-op.
    pub fn deny(
        &self,
        request_id: &RequestId,
        caller: &UserId,
        _now: Timestamp,
    ) -> Result<(), KycError> {
        let request = self
            .requests
            .get_request(request_id)?
            .ok_or_else(|| KycError::NotFound(format!("request {request_id}")))?;

        if &request.user_id != caller {
            return Err(KycError::PermissionDenied(
                "request belongs to another user".to_string(),
            ));
        }

        match request.status {
            RequestStatus::Denied => Ok(()),
            RequestStatus::Approved => Err(KycError::InvalidArgument(
                "request was already approved".to_string(),
            )),
            RequestStatus::Pending => {
                self.requests
                    .set_request_status(request_id, RequestStatus::Denied)?;
                tracing::info!(request = %request_id, "consent request denied");
                Ok(())
            }
        }
    }

    pub(crate) fn get(&self, request_id: &RequestId) -> Result<Option<KycRequest>, KycError> {
        Ok(self.requests.get_request(request_id)?)
    }

    pub(crate) fn set_status(
        &self,
        request_id: &RequestId,
        status: RequestStatus,
    ) -> Result<(), KycError> {
        Ok(self.requests.set_request_status(request_id, status)?)
    }
}
