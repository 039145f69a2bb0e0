//! Consent request and verification token lifecycles.
//!
//! A verifier opens a time-boxed consent request; the user approves or
//! denies it; approval mints a single-use token whose plaintext is shown
//! once; redeeming the token yields the consented profile fields, an
//! audit record and a reward credit.

pub mod engine;
pub mod error;
pub mod extract;
pub mod request;
pub mod token;
pub mod verifier;

pub use engine::{KycEngine, Redemption};
pub use error::KycError;
pub use extract::FieldMap;
pub use request::RequestEngine;
pub use token::TokenEngine;
pub use verifier::VerifierRegistry;
