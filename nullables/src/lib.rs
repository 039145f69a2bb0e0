//! Nullable infrastructure substitutes.
//!
//! Real implementations talk to the wall clock and the network. These
//! stand-ins behave identically at the seam but are fully deterministic:
//! time only moves when a test advances it, and delivery outcomes follow
//! a script instead of a socket.

pub mod clock;
pub mod transport;

pub use clock::NullClock;
pub use transport::NullTransport;
