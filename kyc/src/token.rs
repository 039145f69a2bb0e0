//! Verification token lifecycle: issue and consume.

use crate::error::KycError;
use std::sync::Arc;
use vouch_crypto::{generate_code, sha256_hex};
use vouch_store::{KycRequest, NewVerificationToken, TokenStore, VerificationToken};
use vouch_types::{ServiceParams, Timestamp, VerifierId};

pub struct TokenEngine {
    tokens: Arc<dyn TokenStore>,
    params: ServiceParams,
}

impl TokenEngine {
    pub fn new(tokens: Arc<dyn TokenStore>, params: ServiceParams) -> Self {
        Self { tokens, params }
    }

    /// Mint a token for an approved request. Returns the stored record and
    /// the plaintext code. The plaintext exists only in this return value;
    /// the store holds its digest.
    ///
    /// At most one live token per request: a previous token that is still
    /// live makes this an error, while a stale unused one is expired and
    /// superseded.
    pub fn issue(
        &self,
        request: &KycRequest,
        now: Timestamp,
    ) -> Result<(VerificationToken, String), KycError> {
        if let Some(existing) = self.tokens.get_token_for_request(&request.id)? {
            if existing.is_live(now) {
                return Err(KycError::InvalidArgument(
                    "request already has a live token".to_string(),
                ));
            }
            if !existing.used && !existing.expired {
                self.tokens.mark_token_expired(&existing.id)?;
            }
        }

        self.mint(request, now)
    }

    /// Replace the request's current token, live or not, with a fresh one.
    ///
    /// Used when the approval saga re-runs after a partial failure: the
    /// previous plaintext is unrecoverable (only its digest is stored), so
    /// the unused token is expired and a new code minted.
    pub fn reissue(
        &self,
        request: &KycRequest,
        now: Timestamp,
    ) -> Result<(VerificationToken, String), KycError> {
        if let Some(existing) = self.tokens.get_token_for_request(&request.id)? {
            if !existing.used && !existing.expired {
                self.tokens.mark_token_expired(&existing.id)?;
                tracing::info!(
                    token = %existing.id,
                    request = %request.id,
                    "superseded unused token on approval replay"
                );
            }
        }
        self.mint(request, now)
    }

    fn mint(
        &self,
        request: &KycRequest,
        now: Timestamp,
    ) -> Result<(VerificationToken, String), KycError> {
        let code = generate_code();
        let token = self.tokens.create_token(NewVerificationToken {
            request_id: request.id.clone(),
            user_id: request.user_id.clone(),
            verifier_id: request.verifier_id.clone(),
            token_hash: sha256_hex(&code),
            created_at: now,
            expires_at: now.plus_secs(self.params.token_ttl_secs),
        })?;

        tracing::info!(token = %token.id, request = %request.id, "verification token issued");

        Ok((token, code))
    }

    /// The request's most recent token, used or not.
    pub fn current_token(
        &self,
        request: &KycRequest,
    ) -> Result<Option<VerificationToken>, KycError> {
        Ok(self.tokens.get_token_for_request(&request.id)?)
    }

    /// Redeem a plaintext code on behalf of a verifier.
    ///
    /// Checks run in a fixed order so the caller learns as little as
    /// possible: unknown and already used codes are indistinguishable, and
    /// expiry is reported before ownership. The final `mark_token_used` is
    /// a compare-and-set; the loser of a concurrent redemption race gets
    /// `InvalidToken` like any other consumed code.
    pub fn consume(
        &self,
        verifier_id: &VerifierId,
        plaintext: &str,
        now: Timestamp,
    ) -> Result<VerificationToken, KycError> {
        let token = self
            .tokens
            .get_token_by_hash(&sha256_hex(plaintext))?
            .ok_or(KycError::InvalidToken)?;

        if token.is_expired(now) {
            self.tokens.mark_token_expired(&token.id)?;
            tracing::info!(token = %token.id, "redemption attempted on expired token");
            return Err(KycError::Expired);
        }

        if &token.verifier_id != verifier_id {
            tracing::warn!(
                token = %token.id,
                presented_by = %verifier_id,
                issued_to = %token.verifier_id,
                "token presented by the wrong verifier"
            );
            return Err(KycError::VerifierMismatch);
        }

        if !self.tokens.mark_token_used(&token.id, now)? {
            return Err(KycError::InvalidToken);
        }

        tracing::info!(token = %token.id, request = %token.request_id, "token redeemed");
        Ok(token)
    }
}
