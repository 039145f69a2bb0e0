//! The consent orchestrator.
//!
//! Ties the request, token, webhook and reward engines into the two
//! multi-step operations: the approval saga and redemption. Both are
//! written to converge under retries; every sub-step first checks whether
//! it already happened for this request.

use crate::error::KycError;
use crate::extract::FieldMap;
use crate::request::RequestEngine;
use crate::token::TokenEngine;
use std::collections::BTreeMap;
use std::sync::Arc;
use vouch_rewards::RewardLedger;
use vouch_store::{
    AuditStore, ProfileStore, RequestStatus, VerificationLogEntry, VerifierRecord,
};
use vouch_types::{RequestId, Timestamp, UserId};
use vouch_webhooks::Outbox;

/// What a verifier gets back from a successful redemption.
#[derive(Clone, Debug)]
pub struct Redemption {
    pub user_id: UserId,
    pub request_id: RequestId,
    /// Canonical attribute name -> value for every requested field the
    /// profile could supply.
    pub verified_fields: BTreeMap<String, String>,
    /// True when a post-redemption side effect (audit append, reward
    /// accrual) failed. The token is spent either way; the gap is left to
    /// reconciliation rather than replaying the redemption.
    pub degraded: bool,
}

pub struct KycEngine {
    requests: RequestEngine,
    tokens: TokenEngine,
    outbox: Outbox,
    ledger: RewardLedger,
    profiles: Arc<dyn ProfileStore>,
    audit: Arc<dyn AuditStore>,
    field_map: FieldMap,
}

impl KycEngine {
    pub fn new(
        requests: RequestEngine,
        tokens: TokenEngine,
        outbox: Outbox,
        ledger: RewardLedger,
        profiles: Arc<dyn ProfileStore>,
        audit: Arc<dyn AuditStore>,
    ) -> Self {
        Self {
            requests,
            tokens,
            outbox,
            ledger,
            profiles,
            audit,
            field_map: FieldMap::default(),
        }
    }

    /// Open a consent request on behalf of an authenticated verifier.
    pub fn submit(
        &self,
        verifier: &VerifierRecord,
        user_id: &UserId,
        requested_fields: Vec<String>,
        now: Timestamp,
    ) -> Result<RequestId, KycError> {
        let request = self
            .requests
            .submit(verifier, user_id, requested_fields, now)?;
        Ok(request.id)
    }

    /// The approval saga: mint a token, mark the request approved, enqueue
    /// the webhook. Returns the token plaintext, the only time it exists
    /// outside the caller.
    ///
    /// Re-runnable: a crash between sub-steps leaves a partial state this
    /// method completes on the next call. A previously minted token whose
    /// plaintext is lost is superseded rather than resurrected. A fully
    /// completed approval (token live, webhook enqueued) refuses to run
    /// again, as does a request whose token was already redeemed; consent
    /// is single-use and a second code would re-open it.
    pub fn approve(
        &self,
        request_id: &RequestId,
        caller: &UserId,
        now: Timestamp,
    ) -> Result<String, KycError> {
        let request = self
            .requests
            .get(request_id)?
            .ok_or_else(|| KycError::NotFound(format!("request {request_id}")))?;

        if &request.user_id != caller {
            return Err(KycError::PermissionDenied(
                "request belongs to another user".to_string(),
            ));
        }
        if request.status == RequestStatus::Denied {
            return Err(KycError::InvalidArgument(
                "request was denied".to_string(),
            ));
        }
        if request.is_expired(now) {
            return Err(KycError::Expired);
        }

        let existing = self.tokens.current_token(&request)?;
        if existing.as_ref().is_some_and(|t| t.used) {
            return Err(KycError::InvalidArgument(
                "request token already redeemed".to_string(),
            ));
        }
        let have_live_token = existing.is_some_and(|t| t.is_live(now));
        let have_event = self.outbox.has_event_for_request(&request.id)?;

        if request.status == RequestStatus::Approved && have_live_token && have_event {
            return Err(KycError::InvalidArgument(
                "request already approved".to_string(),
            ));
        }

        let (_, code) = if have_live_token {
            self.tokens.reissue(&request, now)?
        } else {
            self.tokens.issue(&request, now)?
        };

        if request.status != RequestStatus::Approved {
            self.requests
                .set_status(&request.id, RequestStatus::Approved)?;
        }

        if !have_event {
            self.outbox
                .enqueue_approval(&request.verifier_id, &request.id, now)?;
        }

        tracing::info!(request = %request.id, user = %caller, "consent request approved");
        Ok(code)
    }

    /// Decline a request. Delegates to the request engine.
    pub fn deny(
        &self,
        request_id: &RequestId,
        caller: &UserId,
        now: Timestamp,
    ) -> Result<(), KycError> {
        self.requests.deny(request_id, caller, now)
    }

    /// Redeem a token: consume it, extract the consented fields, append
    /// the audit record, credit the reward.
    ///
    /// The token consume is the point of no return. Failures after it are
    /// logged and reported as a degraded result, never as an error that
    /// would invite the verifier to retry an already spent code.
    pub fn redeem(
        &self,
        verifier: &VerifierRecord,
        plaintext: &str,
        source_ip: Option<String>,
        now: Timestamp,
    ) -> Result<Redemption, KycError> {
        let token = self.tokens.consume(&verifier.id, plaintext, now)?;

        let mut degraded = false;

        let requested_fields = match self.requests.get(&token.request_id) {
            Ok(Some(request)) => request.requested_fields,
            Ok(None) => {
                tracing::error!(request = %token.request_id, "redeemed token has no request");
                degraded = true;
                Vec::new()
            }
            Err(e) => {
                tracing::error!(request = %token.request_id, error = %e, "request lookup failed after redemption");
                degraded = true;
                Vec::new()
            }
        };

        let verified_fields = match self.profiles.get_profile(&token.user_id) {
            Ok(Some(profile)) => self.field_map.extract(&profile, &requested_fields),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::error!(user = %token.user_id, error = %e, "profile lookup failed after redemption");
                degraded = true;
                BTreeMap::new()
            }
        };

        let entry = VerificationLogEntry {
            user_id: token.user_id.clone(),
            verifier_id: verifier.id.clone(),
            request_id: token.request_id.clone(),
            verified_fields: verified_fields.keys().cloned().collect(),
            timestamp: now,
            source_ip,
        };
        if let Err(e) = self.audit.append_verification(&entry) {
            tracing::error!(request = %token.request_id, error = %e, "audit append failed after redemption");
            degraded = true;
        }

        if let Err(e) = self.ledger.accrue(&token.user_id, &token.request_id, now) {
            tracing::error!(user = %token.user_id, error = %e, "reward accrual failed after redemption");
            degraded = true;
        }

        Ok(Redemption {
            user_id: token.user_id,
            request_id: token.request_id,
            verified_fields,
            degraded,
        })
    }
}
