//! Parking session domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Vehicle category, affects the billing rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Motorcycle,
    Car,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Motorcycle => "Motorcycle",
            Self::Car => "Car",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Motorcycle" => Some(Self::Motorcycle),
            "Car" => Some(Self::Car),
            _ => None,
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Vehicle is inside, occupying a slot
    Active,
    /// Vehicle has exited, cost is fixed
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Closed => "Closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Active" => Some(Self::Active),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// One vehicle's stay, from entry to exit.
///
/// Invariants (enforced by the parking service before any write):
/// plates are unique among active sessions, `exit_time` and `cost_cents`
/// are present iff the session is closed, and `exit_time > entry_time`.
#[derive(Debug, Clone)]
pub struct ParkingSession {
    pub id: Uuid,
    /// Normalized (trimmed, uppercase) license plate
    pub plate: String,
    pub vehicle_type: VehicleType,
    pub is_electric: bool,
    /// Slot number assigned at entry, 1-based
    pub slot: u32,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    /// Final cost in cents, set when the session closes
    pub cost_cents: Option<i64>,
    pub status: SessionStatus,
}

impl ParkingSession {
    pub fn new(
        plate: impl Into<String>,
        vehicle_type: VehicleType,
        is_electric: bool,
        slot: u32,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate: plate.into(),
            vehicle_type,
            is_electric,
            slot,
            entry_time,
            exit_time: None,
            cost_cents: None,
            status: SessionStatus::Active,
        }
    }

    /// Transition to Closed with the billed cost fixed.
    pub fn close(&mut self, exit_time: DateTime<Utc>, cost_cents: i64) {
        self.exit_time = Some(exit_time);
        self.cost_cents = Some(cost_cents);
        self.status = SessionStatus::Closed;
    }

    /// Revert a closed session to Active (administrative correction).
    pub fn reopen(&mut self) {
        self.exit_time = None;
        self.cost_cents = None;
        self.status = SessionStatus::Active;
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// Normalize a user-supplied plate: trim surrounding whitespace, uppercase.
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// Administrative correction of a session. Absent fields are untouched.
///
/// `exit_time` is doubly optional: `Some(None)` clears the exit and reverts
/// the session to Active, `None` leaves it alone. `cost_cents` is an
/// explicit override; when absent the cost is recomputed whenever both
/// timestamps are present after the patch.
#[derive(Debug, Default, Clone)]
pub struct SessionPatch {
    pub plate: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    pub is_electric: Option<bool>,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<Option<DateTime<Utc>>>,
    pub slot: Option<u32>,
    pub cost_cents: Option<i64>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParkingSession {
        ParkingSession::new("ABC123", VehicleType::Car, false, 1, Utc::now())
    }

    #[test]
    fn new_session_is_active() {
        let s = sample();
        assert!(s.is_active());
        assert_eq!(s.status, SessionStatus::Active);
        assert!(s.exit_time.is_none());
        assert!(s.cost_cents.is_none());
        assert_eq!(s.slot, 1);
    }

    #[test]
    fn close_fixes_exit_and_cost() {
        let mut s = sample();
        let exit = s.entry_time + chrono::Duration::hours(2);
        s.close(exit, 24000);
        assert_eq!(s.status, SessionStatus::Closed);
        assert_eq!(s.exit_time, Some(exit));
        assert_eq!(s.cost_cents, Some(24000));
        assert!(!s.is_active());
    }

    #[test]
    fn reopen_clears_exit_and_cost() {
        let mut s = sample();
        s.close(s.entry_time + chrono::Duration::hours(1), 12000);
        s.reopen();
        assert!(s.is_active());
        assert!(s.exit_time.is_none());
        assert!(s.cost_cents.is_none());
    }

    #[test]
    fn plate_normalization() {
        assert_eq!(normalize_plate("  abc123 "), "ABC123");
        assert_eq!(normalize_plate("xyz-999"), "XYZ-999");
    }

    #[test]
    fn vehicle_type_roundtrip() {
        for vt in &[VehicleType::Motorcycle, VehicleType::Car] {
            assert_eq!(VehicleType::from_str(vt.as_str()), Some(*vt));
        }
        assert!(VehicleType::from_str("Truck").is_none());
    }

    #[test]
    fn status_roundtrip() {
        for st in &[SessionStatus::Active, SessionStatus::Closed] {
            assert_eq!(SessionStatus::from_str(st.as_str()), Some(*st));
        }
        assert!(SessionStatus::from_str("Pending").is_none());
    }
}
