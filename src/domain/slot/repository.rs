//! Slot repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Slot;
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert rows for slot numbers `1..=capacity` that do not exist yet.
    /// Existing rows (including their occupancy) are left untouched.
    async fn ensure_capacity(&self, capacity: u32) -> DomainResult<()>;
    async fn find_by_number(&self, number: u32) -> DomainResult<Option<Slot>>;
    /// Lowest-numbered free slot, if any.
    async fn find_free_lowest(&self) -> DomainResult<Option<u32>>;
    async fn find_all(&self) -> DomainResult<Vec<Slot>>;
    /// Overwrite occupancy state for one slot.
    async fn set_state(
        &self,
        number: u32,
        occupied: bool,
        session_id: Option<Uuid>,
    ) -> DomainResult<()>;
}
