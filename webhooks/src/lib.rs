//! Webhook delivery subsystem.
//!
//! A durable outbox of approval notifications plus a delivery driver that
//! an external scheduler invokes on a fixed cadence. Delivery is
//! at-least-once with bounded exponential backoff; after the retry budget
//! is exhausted an event is terminally failed and kept for operational
//! follow-up. Delivery failures are never surfaced to the approving user.

pub mod driver;
pub mod error;
pub mod http;
pub mod outbox;
pub mod transport;

pub use driver::{backoff_delay_secs, DeliveryDriver, DriverStats};
pub use error::WebhookError;
pub use http::HttpTransport;
pub use outbox::{ApprovalNotice, Outbox};
pub use transport::{TransportError, WebhookTransport};
