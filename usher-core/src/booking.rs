use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::show::Show;

/// Upper bound on seats per booking.
pub const MAX_SEATS_PER_BOOKING: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    /// Only `Succeeded` counts as paid; `Failed` is treated like `Pending`
    /// when the release check decides whether to reclaim a hold.
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded)
    }
}

/// One reservation attempt tied to a show and a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub show_id: Uuid,
    /// Seat labels held by this booking, 1-5, duplicate-free.
    pub seats: Vec<String>,
    /// `show.price_amount * seats.len()`, minor currency units.
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    /// Checkout-session reference from the payment provider, cleared once
    /// the payment outcome is known.
    pub payment_ref: Option<String>,
    /// Checkout URL the user completes payment at; cleared together with
    /// the reference once the outcome is known.
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// New pending booking for `seats` on `show`, priced at commit time.
    pub fn pending(show: &Show, user_id: &str, seats: Vec<String>) -> Self {
        let amount = show.price_amount * seats.len() as i64;
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            show_id: show.id,
            seats,
            amount,
            currency: show.price_currency.clone(),
            status: PaymentStatus::Pending,
            payment_ref: None,
            payment_link: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }
}
