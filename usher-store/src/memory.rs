use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use usher_core::booking::{Booking, PaymentStatus};
use usher_core::payment::CheckoutSession;
use usher_core::repository::{BookingStore, SeatMap, ShowCatalog, StoreError};
use usher_core::show::Show;

/// In-memory show catalog for tests and single-node deployments.
#[derive(Default)]
pub struct MemoryShowCatalog {
    shows: RwLock<HashMap<Uuid, Show>>,
}

impl MemoryShowCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_show(&self, show: Show) {
        self.shows.write().unwrap().insert(show.id, show);
    }
}

#[async_trait]
impl ShowCatalog for MemoryShowCatalog {
    async fn get_show(&self, show_id: Uuid) -> Result<Option<Show>, StoreError> {
        Ok(self.shows.read().unwrap().get(&show_id).cloned())
    }
}

/// Seat ownership store with per-show mutual exclusion: each show gets its
/// own lock, so claims on different shows never contend with each other.
#[derive(Default)]
pub struct MemorySeatMap {
    shows: RwLock<HashMap<Uuid, Arc<Mutex<HashMap<String, String>>>>>,
}

impl MemorySeatMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn show_entry(&self, show_id: Uuid) -> Arc<Mutex<HashMap<String, String>>> {
        if let Some(entry) = self.shows.read().unwrap().get(&show_id) {
            return Arc::clone(entry);
        }
        let mut shows = self.shows.write().unwrap();
        Arc::clone(shows.entry(show_id).or_default())
    }
}

#[async_trait]
impl SeatMap for MemorySeatMap {
    async fn claim_seats(
        &self,
        show_id: Uuid,
        user_id: &str,
        seats: &[String],
    ) -> Result<bool, StoreError> {
        let entry = self.show_entry(show_id);
        let mut owners = entry.lock().unwrap();
        if seats.iter().any(|seat| owners.contains_key(seat)) {
            return Ok(false);
        }
        for seat in seats {
            owners.insert(seat.clone(), user_id.to_string());
        }
        info!(
            "claimed {} seat(s) on show {} for {}",
            seats.len(),
            show_id,
            user_id
        );
        Ok(true)
    }

    async fn release_seat_if_owner(
        &self,
        show_id: Uuid,
        seat: &str,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        let entry = self.show_entry(show_id);
        let mut owners = entry.lock().unwrap();
        match owners.get(seat) {
            Some(owner) if owner == user_id => {
                owners.remove(seat);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn occupied_seats(&self, show_id: Uuid) -> Result<HashMap<String, String>, StoreError> {
        let entry = self.show_entry(show_id);
        let owners = entry.lock().unwrap();
        Ok(owners.clone())
    }
}

#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<(), StoreError> {
        self.bookings
            .lock()
            .unwrap()
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.bookings.lock().unwrap().get(&booking_id).cloned())
    }

    async fn record_payment_outcome(
        &self,
        booking_id: Uuid,
        status: PaymentStatus,
    ) -> Result<(), StoreError> {
        if let Some(booking) = self.bookings.lock().unwrap().get_mut(&booking_id) {
            booking.status = status;
            booking.payment_ref = None;
            booking.payment_link = None;
        }
        Ok(())
    }

    async fn attach_checkout(
        &self,
        booking_id: Uuid,
        session: &CheckoutSession,
    ) -> Result<(), StoreError> {
        if let Some(booking) = self.bookings.lock().unwrap().get_mut(&booking_id) {
            booking.payment_ref = Some(session.id.clone());
            booking.payment_link = Some(session.url.clone());
        }
        Ok(())
    }

    async fn delete(&self, booking_id: Uuid) -> Result<(), StoreError> {
        self.bookings.lock().unwrap().remove(&booking_id);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let mut bookings: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}
