//! Caller identity resolution.
//!
//! Session management is external: something upstream already validated a
//! login and handed out opaque bearer tokens. The RPC layer only needs to
//! turn a token into a user id plus an admin flag, so that seam is a trait.

use axum::http::{header, HeaderMap};
use std::collections::HashMap;
use vouch_types::UserId;

/// The authenticated caller of a user-facing or admin endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: UserId,
    pub admin: bool,
}

/// Resolves bearer tokens to identities.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, bearer: &str) -> Option<CallerIdentity>;
}

/// Fixed token table for development and tests.
#[derive(Default)]
pub struct StaticTokens {
    tokens: HashMap<String, CallerIdentity>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(
            token.into(),
            CallerIdentity {
                user_id: UserId::new(user_id),
                admin: false,
            },
        );
        self
    }

    pub fn with_admin(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(
            token.into(),
            CallerIdentity {
                user_id: UserId::new(user_id),
                admin: true,
            },
        );
        self
    }
}

impl IdentityProvider for StaticTokens {
    fn resolve(&self, bearer: &str) -> Option<CallerIdentity> {
        self.tokens.get(bearer).cloned()
    }
}

/// The token from an `Authorization: Bearer …` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_strips_the_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwdw=="),
        );
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn static_tokens_resolve_users_and_admins() {
        let provider = StaticTokens::new()
            .with_user("tok-user", "u1")
            .with_admin("tok-admin", "root");

        let user = provider.resolve("tok-user").unwrap();
        assert!(!user.admin);
        assert_eq!(user.user_id, UserId::new("u1"));

        let admin = provider.resolve("tok-admin").unwrap();
        assert!(admin.admin);

        assert!(provider.resolve("tok-unknown").is_none());
    }
}
