//! Core business entities, types and traits

pub mod error;
pub mod rates;
pub mod repositories;
pub mod session;
pub mod slot;

pub use error::{DomainError, DomainResult};
pub use rates::RateTable;
pub use repositories::RepositoryProvider;
pub use session::{
    normalize_plate, ParkingSession, SessionFilter, SessionPatch, SessionRepository, SessionStatus,
    VehicleType,
};
pub use slot::{Slot, SlotRepository};
