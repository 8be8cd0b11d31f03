use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A checkout session created with the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String, // Provider's ID (e.g., cs_123)
    pub url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("payment provider rejected the request: {0}")]
    Rejected(String),

    #[error("payment provider unreachable: {0}")]
    Unreachable(String),
}

/// Boundary to the external payment provider. Only checkout initiation is
/// called from the reservation core; the asynchronous outcome arrives later
/// as confirm/fail calls driven by a webhook handler outside this crate.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a checkout session collecting `amount` for `booking_id`.
    /// `label` is the human-readable line-item name (the movie title).
    async fn begin_checkout(
        &self,
        booking_id: Uuid,
        amount: i64,
        currency: &str,
        label: &str,
    ) -> Result<CheckoutSession, GatewayError>;
}
