use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

/// One-shot delayed invocation of the release check.
///
/// Delivery is at-least-once and there is no cancellation: a scheduled
/// check always fires, and the handler re-checks paid status at execution
/// time, so an early confirm followed by a late check is harmless.
#[async_trait]
pub trait ReleaseScheduler: Send + Sync {
    /// Arrange for `release_if_unpaid(booking_id)` to run no earlier than
    /// `after` from now.
    async fn schedule_release(&self, after: Duration, booking_id: Uuid);
}
