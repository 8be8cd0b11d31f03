use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scheduled screening.
///
/// The occupied-seat map is deliberately not part of this document: seat
/// ownership lives in the [`crate::repository::SeatMap`] store as
/// independent (show, seat) records, so that admission can be a single
/// conditional write instead of a read-modify-write on a nested map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub id: Uuid,
    /// Movie title, used as the checkout line-item label.
    pub title: String,
    pub starts_at: DateTime<Utc>,
    /// Ticket price per seat, in minor currency units.
    pub price_amount: i64,
    pub price_currency: String,
}
