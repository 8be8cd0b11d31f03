pub mod booking;
pub mod payment;
pub mod repository;
pub mod scheduler;
pub mod show;

pub use booking::{Booking, PaymentStatus, MAX_SEATS_PER_BOOKING};
pub use payment::{CheckoutSession, GatewayError, PaymentGateway};
pub use repository::{BookingStore, SeatMap, ShowCatalog, StoreError};
pub use scheduler::ReleaseScheduler;
pub use show::Show;
