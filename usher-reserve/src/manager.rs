use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use usher_core::booking::{Booking, PaymentStatus, MAX_SEATS_PER_BOOKING};
use usher_core::payment::PaymentGateway;
use usher_core::repository::{BookingStore, SeatMap, ShowCatalog, StoreError};
use usher_core::scheduler::ReleaseScheduler;
use usher_core::show::Show;

/// Owns seat-occupancy decisions for shows: admission of booking requests,
/// payment-outcome recording, and reclamation of unpaid holds once the
/// hold window elapses.
///
/// All collaborators are injected, so the manager itself carries no I/O
/// beyond what the traits expose and can be exercised with in-memory
/// stores and fakes.
pub struct ReservationManager {
    catalog: Arc<dyn ShowCatalog>,
    seats: Arc<dyn SeatMap>,
    bookings: Arc<dyn BookingStore>,
    gateway: Arc<dyn PaymentGateway>,
    scheduler: Arc<dyn ReleaseScheduler>,
    hold_window: Duration,
}

impl ReservationManager {
    pub fn new(
        catalog: Arc<dyn ShowCatalog>,
        seats: Arc<dyn SeatMap>,
        bookings: Arc<dyn BookingStore>,
        gateway: Arc<dyn PaymentGateway>,
        scheduler: Arc<dyn ReleaseScheduler>,
        hold_window: Duration,
    ) -> Self {
        Self {
            catalog,
            seats,
            bookings,
            gateway,
            scheduler,
            hold_window,
        }
    }

    /// Admission test: true only if none of the requested seats currently
    /// has an owner. Evaluated against the live map, never a cached copy;
    /// the authoritative check is still the conditional write inside
    /// [`Self::create_reservation`].
    pub async fn check_availability(
        &self,
        show_id: Uuid,
        seats: &[String],
    ) -> Result<bool, ReservationError> {
        validate_seat_request(seats)?;
        self.require_show(show_id).await?;
        let occupied = self.seats.occupied_seats(show_id).await?;
        Ok(seats.iter().all(|seat| !occupied.contains_key(seat)))
    }

    /// Admit a booking request: atomically claim the seats, persist a
    /// pending booking, schedule the release check, then start gateway
    /// checkout.
    pub async fn create_reservation(
        &self,
        show_id: Uuid,
        user_id: &str,
        seats: &[String],
    ) -> Result<Booking, ReservationError> {
        validate_seat_request(seats)?;
        let show = self.require_show(show_id).await?;

        // One conditional write: either every seat is claimed or none is,
        // so overlapping concurrent requests cannot both get through.
        if !self.seats.claim_seats(show_id, user_id, seats).await? {
            return Err(ReservationError::SeatsUnavailable);
        }

        let mut booking = Booking::pending(&show, user_id, seats.to_vec());
        if let Err(err) = self.bookings.insert(&booking).await {
            // Seats must never stay claimed without a booking record.
            self.rollback_claim(show_id, user_id, seats).await;
            return Err(ReservationError::Persistence(err));
        }

        info!(
            "reservation {} admitted: show {} seats {:?} user {}",
            booking.id, show_id, seats, user_id
        );
        self.scheduler
            .schedule_release(self.hold_window, booking.id)
            .await;

        match self
            .gateway
            .begin_checkout(booking.id, booking.amount, &booking.currency, &show.title)
            .await
        {
            Ok(session) => {
                if let Err(err) = self.bookings.attach_checkout(booking.id, &session).await {
                    warn!(
                        "could not persist checkout session for booking {}: {}",
                        booking.id, err
                    );
                }
                booking.payment_ref = Some(session.id);
                booking.payment_link = Some(session.url);
                Ok(booking)
            }
            Err(err) => {
                // Seats stay committed; the release timer reclaims the hold
                // if checkout is never retried. Trade-off: a short-lived
                // hold instead of a rollback path through the gateway.
                warn!(
                    "checkout initiation failed for booking {}: {}",
                    booking.id, err
                );
                Err(ReservationError::GatewayInitiationFailed {
                    booking_id: booking.id,
                })
            }
        }
    }

    /// Mark the booking paid. Idempotent, and a no-op when the booking has
    /// already been reclaimed.
    pub async fn confirm_payment(&self, booking_id: Uuid) -> Result<(), ReservationError> {
        self.bookings
            .record_payment_outcome(booking_id, PaymentStatus::Succeeded)
            .await?;
        info!("booking {} marked paid", booking_id);
        Ok(())
    }

    /// Record a failed payment. Seats are not freed here; the release
    /// check treats anything unpaid the same way once the hold expires.
    pub async fn fail_payment(&self, booking_id: Uuid) -> Result<(), ReservationError> {
        self.bookings
            .record_payment_outcome(booking_id, PaymentStatus::Failed)
            .await?;
        info!("booking {} marked failed, hold stands until release", booking_id);
        Ok(())
    }

    /// Release check, invoked by the scheduler once the hold window has
    /// elapsed. At-least-once delivery is fine: after the first effective
    /// run the booking is gone and later runs are no-ops.
    pub async fn release_if_unpaid(&self, booking_id: Uuid) -> Result<(), ReservationError> {
        let Some(booking) = self.bookings.get(booking_id).await? else {
            // Already reclaimed, or raced with another delivery.
            return Ok(());
        };
        if booking.is_paid() {
            return Ok(());
        }

        for seat in &booking.seats {
            let released = self
                .seats
                .release_seat_if_owner(booking.show_id, seat, &booking.user_id)
                .await?;
            if !released {
                warn!(
                    "seat {} on show {} no longer owned by {}, leaving it",
                    seat, booking.show_id, booking.user_id
                );
            }
        }
        self.bookings.delete(booking_id).await?;
        info!(
            "unpaid booking {} reclaimed, {} seat(s) freed",
            booking_id,
            booking.seats.len()
        );
        Ok(())
    }

    /// Seat labels currently claimed for a show.
    pub async fn occupied_seats(&self, show_id: Uuid) -> Result<Vec<String>, ReservationError> {
        self.require_show(show_id).await?;
        let occupied = self.seats.occupied_seats(show_id).await?;
        Ok(occupied.into_keys().collect())
    }

    /// A user's bookings, newest first.
    pub async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, ReservationError> {
        Ok(self.bookings.list_for_user(user_id).await?)
    }

    async fn require_show(&self, show_id: Uuid) -> Result<Show, ReservationError> {
        self.catalog
            .get_show(show_id)
            .await?
            .ok_or(ReservationError::ShowNotFound(show_id))
    }

    /// Best-effort undo of a claim whose booking record could not be
    /// written. The ownership check keeps this from touching seats that
    /// were somehow reassigned in between.
    ///
    /// If a release call itself errors the seat leaks until an operator
    /// frees it: no booking record exists, so no release timer will come
    /// for it.
    async fn rollback_claim(&self, show_id: Uuid, user_id: &str, seats: &[String]) {
        for seat in seats {
            if let Err(err) = self
                .seats
                .release_seat_if_owner(show_id, seat, user_id)
                .await
            {
                warn!(
                    "failed to roll back seat {} on show {}: {}",
                    seat, show_id, err
                );
            }
        }
    }
}

/// Rejects malformed seat requests before any lookup happens.
fn validate_seat_request(seats: &[String]) -> Result<(), ReservationError> {
    if seats.is_empty() {
        return Err(ReservationError::InvalidRequest(
            "no seats requested".to_string(),
        ));
    }
    if seats.len() > MAX_SEATS_PER_BOOKING {
        return Err(ReservationError::InvalidRequest(format!(
            "at most {} seats per booking",
            MAX_SEATS_PER_BOOKING
        )));
    }
    let mut seen = HashSet::new();
    for seat in seats {
        if seat.trim().is_empty() {
            return Err(ReservationError::InvalidRequest(
                "blank seat label".to_string(),
            ));
        }
        if !seen.insert(seat.as_str()) {
            return Err(ReservationError::InvalidRequest(format!(
                "duplicate seat {}",
                seat
            )));
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("show not found: {0}")]
    ShowNotFound(Uuid),

    #[error("selected seats are not available")]
    SeatsUnavailable,

    #[error("invalid reservation request: {0}")]
    InvalidRequest(String),

    #[error("checkout could not be started for booking {booking_id}; the reservation stands until the release timer runs")]
    GatewayInitiationFailed { booking_id: Uuid },

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}
