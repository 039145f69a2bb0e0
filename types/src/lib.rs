//! Fundamental types shared across the VOUCH workspace.
//!
//! Identifier newtypes, the protocol timestamp, and the tunable service
//! parameters. Entity records live next to their storage traits in
//! `vouch-store`.

pub mod ids;
pub mod params;
pub mod time;

pub use ids::{EventId, RequestId, TokenId, UserId, VerifierId};
pub use params::ServiceParams;
pub use time::Timestamp;
