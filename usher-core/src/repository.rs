use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{Booking, PaymentStatus};
use crate::payment::CheckoutSession;
use crate::show::Show;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Read access to scheduled screenings. Show creation and movie metadata
/// are owned by the catalog service, not by the reservation core.
#[async_trait]
pub trait ShowCatalog: Send + Sync {
    async fn get_show(&self, show_id: Uuid) -> Result<Option<Show>, StoreError>;
}

/// Seat ownership per show, modelled as independent (show, seat) records
/// with a uniqueness guarantee per pair. The conditional write in
/// `claim_seats` is what makes admission race-free: there is no separate
/// check-then-act window for concurrent callers to slip through.
#[async_trait]
pub trait SeatMap: Send + Sync {
    /// All-or-nothing claim: mark every seat in `seats` as owned by
    /// `user_id`, only if none of them currently has an owner. Returns
    /// false, writing nothing, when any seat is already taken.
    async fn claim_seats(
        &self,
        show_id: Uuid,
        user_id: &str,
        seats: &[String],
    ) -> Result<bool, StoreError>;

    /// Remove a seat entry only if it still belongs to `user_id`; returns
    /// whether an entry was removed.
    async fn release_seat_if_owner(
        &self,
        show_id: Uuid,
        seat: &str,
        user_id: &str,
    ) -> Result<bool, StoreError>;

    /// Current seat-label to owner map for a show.
    async fn occupied_seats(&self, show_id: Uuid) -> Result<HashMap<String, String>, StoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<(), StoreError>;

    async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Record the gateway outcome: set the status and drop the checkout
    /// reference and link, which are no longer actionable. Must be a no-op
    /// when the booking has already been reclaimed.
    async fn record_payment_outcome(
        &self,
        booking_id: Uuid,
        status: PaymentStatus,
    ) -> Result<(), StoreError>;

    /// Attach the provider's checkout session: its id as the payment
    /// reference and its URL as the link the user pays at.
    async fn attach_checkout(
        &self,
        booking_id: Uuid,
        session: &CheckoutSession,
    ) -> Result<(), StoreError>;

    /// Delete is idempotent: removing an absent booking is not an error.
    async fn delete(&self, booking_id: Uuid) -> Result<(), StoreError>;

    /// A user's bookings, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;
}
