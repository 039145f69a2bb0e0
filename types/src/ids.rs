//! Opaque identifier newtypes.
//!
//! Identifiers for store-backed entities (requests, tokens, webhook events)
//! are assigned by the document store and treated as opaque strings. User
//! and verifier identifiers come from the external identity and credential
//! systems.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// A data subject, as identified by the external identity provider.
    UserId
);

string_id!(
    /// A third-party verifier platform registered in the credential store.
    VerifierId
);

string_id!(
    /// A consent request document id (store-assigned).
    RequestId
);

string_id!(
    /// A verification token document id (store-assigned).
    TokenId
);

string_id!(
    /// A webhook outbox event id (store-assigned).
    EventId
);
