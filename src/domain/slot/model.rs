//! Slot domain entity

use uuid::Uuid;

/// One physical parking position.
///
/// A slot is occupied by at most one session at a time. `occupied` may be
/// set with `session_id` still empty for the short span between acquire and
/// bind inside a single orchestrated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// 1-based slot number, fixed at lot construction
    pub number: u32,
    pub occupied: bool,
    /// Occupying session when bound
    pub session_id: Option<Uuid>,
}

impl Slot {
    pub fn free(number: u32) -> Self {
        Self {
            number,
            occupied: false,
            session_id: None,
        }
    }

    pub fn is_free(&self) -> bool {
        !self.occupied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_slot_has_no_binding() {
        let s = Slot::free(3);
        assert!(s.is_free());
        assert_eq!(s.number, 3);
        assert!(s.session_id.is_none());
    }
}
