//! Session repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::ParkingSession;
use crate::domain::DomainResult;

/// Filter for session listing. The plate filter is a case-insensitive
/// substring match.
#[derive(Debug, Default, Clone)]
pub struct SessionFilter {
    pub plate_contains: Option<String>,
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: ParkingSession) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ParkingSession>>;
    async fn find_active_by_plate(&self, plate: &str) -> DomainResult<Option<ParkingSession>>;
    /// Page of sessions ordered by entry time descending, ties broken by id
    /// ascending. Returns the page items and the total matching count.
    async fn find_page(
        &self,
        filter: &SessionFilter,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ParkingSession>, u64)>;
    /// All-or-nothing replacement of the stored record.
    async fn update(&self, session: ParkingSession) -> DomainResult<()>;
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
    /// Closed sessions with `exit_time` in `[start, end)`.
    async fn find_closed_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<ParkingSession>>;
    /// All active sessions (startup slot reconciliation).
    async fn find_active(&self) -> DomainResult<Vec<ParkingSession>>;
}
