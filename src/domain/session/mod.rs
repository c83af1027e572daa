//! Parking session aggregate
//!
//! Contains the ParkingSession entity, related types, and repository interface.

pub mod model;
pub mod repository;

pub use model::{normalize_plate, ParkingSession, SessionPatch, SessionStatus, VehicleType};
pub use repository::{SessionFilter, SessionRepository};
