//! Shared utilities for the VOUCH workspace.

pub mod logging;

pub use logging::init_tracing;
