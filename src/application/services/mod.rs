//! Application services

pub mod closing;
pub mod parking;
pub mod slot_pool;

pub use closing::{ClosingAggregator, DailyClosing};
pub use parking::ParkingService;
pub use slot_pool::SlotPool;
