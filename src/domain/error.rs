//! Domain error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Vehicle with plate {0} already has an active session")]
    DuplicateActivePlate(String),

    #[error("No slot available: the lot is full")]
    NoSlotAvailable,

    #[error("Slot {0} is occupied by another active session")]
    SlotOccupied(u32),

    #[error("Invalid timing: {0}")]
    InvalidTiming(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_unavailable_is_transient() {
        assert!(DomainError::StoreUnavailable("connection reset".into()).is_transient());
        assert!(!DomainError::NoSlotAvailable.is_transient());
        assert!(!DomainError::DuplicateActivePlate("ABC123".into()).is_transient());
    }
}
