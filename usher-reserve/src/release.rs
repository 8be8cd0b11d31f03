use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

use usher_core::scheduler::ReleaseScheduler;

use crate::manager::ReservationManager;

/// Tokio-backed one-shot scheduler. Every schedule call spawns a sleeper
/// that hands the booking id to the release worker once the delay has
/// elapsed; nothing is cancellable, matching the at-least-once contract.
pub struct TokioReleaseScheduler {
    tx: mpsc::UnboundedSender<Uuid>,
}

impl TokioReleaseScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Uuid>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ReleaseScheduler for TokioReleaseScheduler {
    async fn schedule_release(&self, after: Duration, booking_id: Uuid) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            sleep(after).await;
            if tx.send(booking_id).is_err() {
                error!(
                    "release worker gone, dropping release check for booking {}",
                    booking_id
                );
            }
        });
    }
}

/// Drains scheduled release checks and runs them against the manager.
/// Errors are logged and swallowed: the handler is idempotent and the
/// scheduler's at-least-once delivery is the retry mechanism.
pub async fn run_release_worker(
    manager: Arc<ReservationManager>,
    mut rx: mpsc::UnboundedReceiver<Uuid>,
) {
    info!("release worker started");
    while let Some(booking_id) = rx.recv().await {
        if let Err(err) = manager.release_if_unpaid(booking_id).await {
            error!("release check failed for booking {}: {}", booking_id, err);
        }
    }
    info!("release worker stopped");
}
