//! Token codec for the VOUCH protocol.
//!
//! Two primitives: generation of opaque, high-entropy verification codes,
//! and the deterministic one-way digest under which they are stored and
//! looked up. The plaintext code itself is never persisted — digest
//! equality is the redemption predicate.

pub mod hash;
pub mod token;

pub use hash::sha256_hex;
pub use token::generate_code;
