//! Business logic and use cases

pub mod services;

pub use services::{ClosingAggregator, DailyClosing, ParkingService, SlotPool};
