//! Parking orchestration service
//!
//! Owns the session lifecycle and coordinates the slot pool, the session
//! store and the rate table. Every mutating operation runs inside the
//! lot-level mutex, so entries, exits, edits and deletes are serializable
//! with respect to each other; reads never take the lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::application::services::slot_pool::SlotPool;
use crate::domain::{
    normalize_plate, DomainError, DomainResult, ParkingSession, RateTable, RepositoryProvider,
    SessionFilter, SessionPatch, SessionStatus, VehicleType,
};

pub struct ParkingService {
    repos: Arc<dyn RepositoryProvider>,
    slots: SlotPool,
    rates: RateTable,
    /// Single arbitration point for all lot mutations
    lot: Mutex<()>,
}

impl ParkingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, rates: RateTable) -> Self {
        Self {
            slots: SlotPool::new(repos.clone()),
            repos,
            rates,
            lot: Mutex::new(()),
        }
    }

    /// Register a vehicle entering the lot.
    ///
    /// Assigns the lowest free slot and creates an Active session. Fails
    /// with `DuplicateActivePlate` if the plate is already inside and with
    /// `NoSlotAvailable` when the lot is full.
    pub async fn register_entry(
        &self,
        plate: &str,
        vehicle_type: VehicleType,
        is_electric: bool,
        entry_time: Option<DateTime<Utc>>,
    ) -> DomainResult<ParkingSession> {
        let plate = normalize_plate(plate);
        if plate.is_empty() {
            return Err(DomainError::Validation("plate must not be empty".to_string()));
        }
        let entry_time = entry_time.unwrap_or_else(Utc::now);
        if entry_time > Utc::now() {
            return Err(DomainError::InvalidTiming(format!(
                "entry time {} is in the future",
                entry_time
            )));
        }

        let _guard = self.lot.lock().await;

        if let Some(existing) = self.repos.sessions().find_active_by_plate(&plate).await? {
            debug_assert!(existing.is_active());
            return Err(DomainError::DuplicateActivePlate(plate));
        }

        let slot = self.slots.acquire().await?;
        let session = ParkingSession::new(plate, vehicle_type, is_electric, slot, entry_time);

        if let Err(e) = self.repos.sessions().insert(session.clone()).await {
            // Roll back the reservation so the slot is not leaked.
            let _ = self.slots.release(slot).await;
            return Err(e);
        }
        self.slots.bind(slot, session.id).await?;

        info!(
            "Entry registered: plate={} type={} slot={} session={}",
            session.plate,
            session.vehicle_type.as_str(),
            slot,
            session.id
        );
        Ok(session)
    }

    /// Register a vehicle exiting the lot: bills the stay, closes the
    /// session and frees its slot.
    pub async fn register_exit(
        &self,
        plate: &str,
        exit_time: Option<DateTime<Utc>>,
    ) -> DomainResult<ParkingSession> {
        let plate = normalize_plate(plate);
        let exit_time = exit_time.unwrap_or_else(Utc::now);

        let _guard = self.lot.lock().await;

        let Some(mut session) = self.repos.sessions().find_active_by_plate(&plate).await? else {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "plate",
                value: plate,
            });
        };

        let cost = self.rates.cost_cents(
            session.entry_time,
            exit_time,
            session.vehicle_type,
            session.is_electric,
        )?;

        session.close(exit_time, cost);
        self.repos.sessions().update(session.clone()).await?;
        self.slots.release(session.slot).await?;

        info!(
            "Exit registered: plate={} slot={} cost_cents={} session={}",
            session.plate, session.slot, cost, session.id
        );
        Ok(session)
    }

    pub async fn get_session(&self, id: Uuid) -> DomainResult<ParkingSession> {
        self.repos
            .sessions()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: id.to_string(),
            })
    }

    /// Administrative correction of any session field.
    ///
    /// The patch is applied to a copy, all invariants are re-validated, and
    /// only then is anything written. When both timestamps are present
    /// after the patch the cost is recomputed (unless explicitly
    /// overridden) and the session is forced Closed; clearing the exit time
    /// reverts it to Active and re-occupies its slot.
    pub async fn edit_session(
        &self,
        id: Uuid,
        patch: SessionPatch,
    ) -> DomainResult<ParkingSession> {
        let _guard = self.lot.lock().await;

        let Some(current) = self.repos.sessions().find_by_id(id).await? else {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: id.to_string(),
            });
        };

        // Apply the patch hypothetically.
        let mut patched = current.clone();
        if let Some(ref plate) = patch.plate {
            let plate = normalize_plate(plate);
            if plate.is_empty() {
                return Err(DomainError::Validation("plate must not be empty".to_string()));
            }
            patched.plate = plate;
        }
        if let Some(vt) = patch.vehicle_type {
            patched.vehicle_type = vt;
        }
        if let Some(e) = patch.is_electric {
            patched.is_electric = e;
        }
        if let Some(t) = patch.entry_time {
            if t > Utc::now() {
                return Err(DomainError::InvalidTiming(format!(
                    "entry time {} is in the future",
                    t
                )));
            }
            patched.entry_time = t;
        }
        if let Some(exit) = patch.exit_time {
            patched.exit_time = exit;
        }
        if let Some(slot) = patch.slot {
            patched.slot = slot;
        }

        // Status and cost follow from the timestamps.
        match patched.exit_time {
            Some(exit) => {
                if exit <= patched.entry_time {
                    return Err(DomainError::InvalidTiming(format!(
                        "exit time {} is not after entry time {}",
                        exit, patched.entry_time
                    )));
                }
                patched.status = SessionStatus::Closed;
                patched.cost_cents = match patch.cost_cents {
                    Some(cents) => Some(cents),
                    None => Some(self.rates.cost_cents(
                        patched.entry_time,
                        exit,
                        patched.vehicle_type,
                        patched.is_electric,
                    )?),
                };
            }
            None => {
                patched.status = SessionStatus::Active;
                patched.cost_cents = None;
            }
        }

        let was_active = current.is_active();
        let now_active = patched.is_active();

        // Uniqueness among active plates, excluding the session itself.
        // Reopening a closed session can collide just like a plate change.
        if now_active && (!was_active || patched.plate != current.plate) {
            if let Some(other) = self
                .repos
                .sessions()
                .find_active_by_plate(&patched.plate)
                .await?
            {
                if other.id != id {
                    return Err(DomainError::DuplicateActivePlate(patched.plate));
                }
            }
        }

        // Pre-validate slot availability before committing anything.
        if now_active && (!was_active || patched.slot != current.slot) {
            let Some(target) = self.repos.slots().find_by_number(patched.slot).await? else {
                return Err(DomainError::NotFound {
                    entity: "Slot",
                    field: "number",
                    value: patched.slot.to_string(),
                });
            };
            if target.occupied && target.session_id != Some(id) {
                return Err(DomainError::SlotOccupied(patched.slot));
            }
        }

        self.repos.sessions().update(patched.clone()).await?;

        match (was_active, now_active) {
            (true, true) => {
                if patched.slot != current.slot {
                    self.slots.reassign(current.slot, patched.slot, id).await?;
                }
            }
            (true, false) => {
                self.slots.release(current.slot).await?;
            }
            (false, true) => {
                self.slots.occupy(patched.slot, id).await?;
            }
            (false, false) => {}
        }

        info!(
            "Session edited: session={} status={} slot={}",
            id,
            patched.status.as_str(),
            patched.slot
        );
        Ok(patched)
    }

    /// Delete a session permanently. An active session's slot is released
    /// first.
    pub async fn delete_session(&self, id: Uuid) -> DomainResult<()> {
        let _guard = self.lot.lock().await;

        let Some(session) = self.repos.sessions().find_by_id(id).await? else {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: id.to_string(),
            });
        };
        if session.is_active() {
            self.slots.release(session.slot).await?;
        }
        self.repos.sessions().delete(id).await?;

        info!("Session deleted: session={} plate={}", id, session.plate);
        Ok(())
    }

    /// Read-only session listing; never touches slot or session state.
    pub async fn list_sessions(
        &self,
        filter: &SessionFilter,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ParkingSession>, u64)> {
        self.repos.sessions().find_page(filter, page, limit).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
