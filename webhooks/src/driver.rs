//! The delivery driver.
//!
//! Invoked on a fixed cadence by an external scheduler. Each run claims a
//! bounded batch of due pending events and attempts delivery of each one
//! independently; one event's outcome never affects another's. Racing
//! driver runs are safe: transitions are conditional on the event still
//! being pending, so the loser observes a non-pending status and skips.

use crate::error::WebhookError;
use crate::transport::WebhookTransport;
use std::sync::Arc;
use vouch_store::{EventStatus, WebhookStore};
use vouch_types::{ServiceParams, Timestamp};

/// Retry delay after the Nth failed attempt: `N * base * 2^N` seconds.
///
/// With the 60-second base this yields 2, 16, 72 and 256 minutes for
/// attempts 1 through 4. The curve grows much faster than the 5-attempt
/// budget suggests was intended; it is preserved as deployed rather than
/// corrected. See DESIGN.md.
pub fn backoff_delay_secs(attempts: u32, base_secs: u64) -> u64 {
    (attempts as u64)
        .saturating_mul(base_secs)
        .saturating_mul(1u64.checked_shl(attempts).unwrap_or(u64::MAX))
}

/// Counters from one driver invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DriverStats {
    /// Due events claimed this run.
    pub claimed: usize,
    /// Acknowledged by the verifier.
    pub delivered: usize,
    /// Failed and rescheduled with backoff.
    pub rescheduled: usize,
    /// Failed terminally (retry budget exhausted).
    pub exhausted: usize,
    /// Skipped because another run won the race, or a per-event store
    /// error forced moving on.
    pub skipped: usize,
}

/// Drains the webhook outbox.
pub struct DeliveryDriver<T: WebhookTransport> {
    outbox: Arc<dyn WebhookStore>,
    pub transport: T,
    params: ServiceParams,
}

impl<T: WebhookTransport> DeliveryDriver<T> {
    pub fn new(outbox: Arc<dyn WebhookStore>, transport: T, params: ServiceParams) -> Self {
        Self {
            outbox,
            transport,
            params,
        }
    }

    /// Process one batch of due events. Idempotent to re-invocation.
    pub async fn run_once(&self, now: Timestamp) -> Result<DriverStats, WebhookError> {
        let due = self
            .outbox
            .due_events(now, self.params.webhook_batch_size)?;

        let mut stats = DriverStats {
            claimed: due.len(),
            ..DriverStats::default()
        };

        if due.is_empty() {
            tracing::debug!("no pending webhooks to process");
            return Ok(stats);
        }

        for event in due {
            if let Err(e) = self.process_event(&event.id, now, &mut stats).await {
                // Isolation: a store failure on one event must not stop the batch.
                tracing::warn!(event = %event.id, error = %e, "skipping event after store error");
                stats.skipped += 1;
            }
        }

        Ok(stats)
    }

    async fn process_event(
        &self,
        id: &vouch_types::EventId,
        now: Timestamp,
        stats: &mut DriverStats,
    ) -> Result<(), WebhookError> {
        // Re-check status immediately before dispatch; a concurrent run may
        // have finished this event already.
        let event = match self.outbox.get_event(id)? {
            Some(e) if e.status == EventStatus::Pending => e,
            _ => {
                stats.skipped += 1;
                return Ok(());
            }
        };

        tracing::info!(event = %event.id, url = %event.callback_url, "attempting webhook delivery");

        match self.transport.deliver(&event.callback_url, &event.payload).await {
            Ok(()) => {
                if self.outbox.mark_event_delivered(&event.id)? {
                    tracing::info!(event = %event.id, "webhook delivered");
                    stats.delivered += 1;
                } else {
                    stats.skipped += 1;
                }
            }
            Err(err) => {
                let attempts = event.attempts + 1;
                tracing::warn!(
                    event = %event.id,
                    attempt = attempts,
                    error = %err,
                    "webhook delivery failed"
                );

                if attempts >= self.params.webhook_max_attempts {
                    if self.outbox.record_event_failure(&event.id, attempts, None)? {
                        tracing::error!(
                            event = %event.id,
                            attempts,
                            "webhook failed permanently"
                        );
                        stats.exhausted += 1;
                    } else {
                        stats.skipped += 1;
                    }
                } else {
                    let delay = backoff_delay_secs(attempts, self.params.webhook_base_delay_secs);
                    let next = now.plus_secs(delay);
                    if self.outbox.record_event_failure(&event.id, attempts, Some(next))? {
                        tracing::info!(event = %event.id, retry_at = %next, "webhook retry scheduled");
                        stats.rescheduled += 1;
                    } else {
                        stats.skipped += 1;
                    }
                }
            }
        }

        Ok(())
    }
}
