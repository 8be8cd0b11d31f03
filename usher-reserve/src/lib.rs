pub mod manager;
pub mod release;

pub use manager::{ReservationError, ReservationManager};
pub use release::{run_release_worker, TokioReleaseScheduler};
