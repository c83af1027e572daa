//! In-memory repository doubles for service-level tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::session::{ParkingSession, SessionFilter, SessionRepository};
use crate::domain::slot::{Slot, SlotRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, SessionStatus};

#[derive(Default)]
pub struct MemorySessionRepository {
    inner: Mutex<HashMap<Uuid, ParkingSession>>,
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, session: ParkingSession) -> DomainResult<()> {
        self.inner.lock().unwrap().insert(session.id, session);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ParkingSession>> {
        Ok(self.inner.lock().unwrap().get(&id).cloned())
    }

    async fn find_active_by_plate(&self, plate: &str) -> DomainResult<Option<ParkingSession>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .find(|s| s.plate == plate && s.status == SessionStatus::Active)
            .cloned())
    }

    async fn find_page(
        &self,
        filter: &SessionFilter,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ParkingSession>, u64)> {
        let needle = filter.plate_contains.as_ref().map(|n| n.to_uppercase());
        let mut matching: Vec<ParkingSession> = self
            .inner
            .lock()
            .unwrap()
            .values()
            .filter(|s| match needle {
                Some(ref n) => s.plate.contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.entry_time
                .cmp(&a.entry_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        let total = matching.len() as u64;
        let start = (page.saturating_sub(1) * limit) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        Ok((items, total))
    }

    async fn update(&self, session: ParkingSession) -> DomainResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.contains_key(&session.id) {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: session.id.to_string(),
            });
        }
        inner.insert(session.id, session);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if self.inner.lock().unwrap().remove(&id).is_none() {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn find_closed_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<ParkingSession>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .filter(|s| {
                s.status == SessionStatus::Closed
                    && s.exit_time.map(|t| t >= start && t < end).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn find_active(&self) -> DomainResult<Vec<ParkingSession>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.status == SessionStatus::Active)
            .cloned()
            .collect())
    }
}

pub struct MemorySlotRepository {
    inner: Mutex<BTreeMap<u32, Slot>>,
}

impl MemorySlotRepository {
    pub fn with_capacity(capacity: u32) -> Self {
        let slots = (1..=capacity).map(|n| (n, Slot::free(n))).collect();
        Self {
            inner: Mutex::new(slots),
        }
    }
}

#[async_trait]
impl SlotRepository for MemorySlotRepository {
    async fn ensure_capacity(&self, capacity: u32) -> DomainResult<()> {
        let mut inner = self.inner.lock().unwrap();
        for n in 1..=capacity {
            inner.entry(n).or_insert_with(|| Slot::free(n));
        }
        Ok(())
    }

    async fn find_by_number(&self, number: u32) -> DomainResult<Option<Slot>> {
        Ok(self.inner.lock().unwrap().get(&number).cloned())
    }

    async fn find_free_lowest(&self) -> DomainResult<Option<u32>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .find(|s| s.is_free())
            .map(|s| s.number))
    }

    async fn find_all(&self) -> DomainResult<Vec<Slot>> {
        Ok(self.inner.lock().unwrap().values().cloned().collect())
    }

    async fn set_state(
        &self,
        number: u32,
        occupied: bool,
        session_id: Option<Uuid>,
    ) -> DomainResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let Some(slot) = inner.get_mut(&number) else {
            return Err(DomainError::NotFound {
                entity: "Slot",
                field: "number",
                value: number.to_string(),
            });
        };
        slot.occupied = occupied;
        slot.session_id = session_id;
        Ok(())
    }
}

pub struct MemoryRepositoryProvider {
    sessions: MemorySessionRepository,
    slots: MemorySlotRepository,
}

impl RepositoryProvider for MemoryRepositoryProvider {
    fn sessions(&self) -> &dyn SessionRepository {
        &self.sessions
    }

    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }
}

/// Provider over empty in-memory stores with `capacity` free slots.
pub fn memory_provider(capacity: u32) -> Arc<dyn RepositoryProvider> {
    Arc::new(MemoryRepositoryProvider {
        sessions: MemorySessionRepository::default(),
        slots: MemorySlotRepository::with_capacity(capacity),
    })
}
