pub mod app_config;
pub mod memory;
pub mod redis_repo;

pub use memory::{MemoryBookingStore, MemorySeatMap, MemoryShowCatalog};
pub use redis_repo::RedisSeatMap;
