//! Slot pool: exclusive mapping from slot number to occupying session
//!
//! All mutating calls must happen inside the parking service's lot-level
//! critical section; the pool itself does not lock.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, SessionStatus};

pub struct SlotPool {
    repos: Arc<dyn RepositoryProvider>,
}

impl SlotPool {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Reserve the lowest-numbered free slot, marking it occupied pending
    /// session binding. Fails with `NoSlotAvailable` when the lot is full.
    pub async fn acquire(&self) -> DomainResult<u32> {
        let Some(number) = self.repos.slots().find_free_lowest().await? else {
            return Err(DomainError::NoSlotAvailable);
        };
        self.repos.slots().set_state(number, true, None).await?;
        Ok(number)
    }

    /// Associate a reserved slot with its session. Called immediately after
    /// `acquire` within the same orchestrated operation.
    pub async fn bind(&self, number: u32, session_id: Uuid) -> DomainResult<()> {
        self.repos
            .slots()
            .set_state(number, true, Some(session_id))
            .await
    }

    /// Mark a slot free. Idempotent: releasing a free slot is a no-op, but
    /// releasing a slot whose bound session is still active is logged as an
    /// inconsistency.
    pub async fn release(&self, number: u32) -> DomainResult<()> {
        let Some(slot) = self.repos.slots().find_by_number(number).await? else {
            return Err(DomainError::NotFound {
                entity: "Slot",
                field: "number",
                value: number.to_string(),
            });
        };
        if slot.is_free() {
            return Ok(());
        }
        if let Some(session_id) = slot.session_id {
            if let Some(session) = self.repos.sessions().find_by_id(session_id).await? {
                if session.status == SessionStatus::Active {
                    warn!(
                        "Releasing slot {} while its session {} is still active",
                        number, session_id
                    );
                }
            }
        }
        self.repos.slots().set_state(number, false, None).await
    }

    /// Move a session's binding to another slot. Fails with `SlotOccupied`
    /// if the target slot is held by a different session.
    pub async fn reassign(&self, from: u32, to: u32, session_id: Uuid) -> DomainResult<()> {
        if from == to {
            return Ok(());
        }
        let Some(target) = self.repos.slots().find_by_number(to).await? else {
            return Err(DomainError::NotFound {
                entity: "Slot",
                field: "number",
                value: to.to_string(),
            });
        };
        if target.occupied && target.session_id != Some(session_id) {
            return Err(DomainError::SlotOccupied(to));
        }
        self.repos.slots().set_state(to, true, Some(session_id)).await?;
        self.repos.slots().set_state(from, false, None).await?;
        Ok(())
    }

    /// Occupy a specific slot for a session (used when reopening a closed
    /// session). Fails with `SlotOccupied` if a different session holds it.
    pub async fn occupy(&self, number: u32, session_id: Uuid) -> DomainResult<()> {
        let Some(slot) = self.repos.slots().find_by_number(number).await? else {
            return Err(DomainError::NotFound {
                entity: "Slot",
                field: "number",
                value: number.to_string(),
            });
        };
        if slot.occupied && slot.session_id != Some(session_id) {
            return Err(DomainError::SlotOccupied(number));
        }
        self.repos.slots().set_state(number, true, Some(session_id)).await
    }

    /// Rebuild the slot table's occupancy from the active sessions. Run at
    /// startup so a crash between a session write and a slot write cannot
    /// leave the table out of sync.
    pub async fn reconcile(&self) -> DomainResult<()> {
        let active = self.repos.sessions().find_active().await?;
        let slots = self.repos.slots().find_all().await?;

        for slot in slots {
            let holder = active.iter().find(|s| s.slot == slot.number);
            match holder {
                Some(session) => {
                    if !slot.occupied || slot.session_id != Some(session.id) {
                        info!(
                            "Reconciling slot {}: binding to active session {}",
                            slot.number, session.id
                        );
                        self.repos
                            .slots()
                            .set_state(slot.number, true, Some(session.id))
                            .await?;
                    }
                }
                None => {
                    if slot.occupied {
                        info!("Reconciling slot {}: freeing stale occupancy", slot.number);
                        self.repos.slots().set_state(slot.number, false, None).await?;
                    }
                }
            }
        }
        Ok(())
    }
}
