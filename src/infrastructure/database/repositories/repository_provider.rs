//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::session::SessionRepository;
use crate::domain::slot::SlotRepository;

use super::session_repository::SeaOrmSessionRepository;
use super::slot_repository::SeaOrmSlotRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    sessions: SeaOrmSessionRepository,
    slots: SeaOrmSlotRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            sessions: SeaOrmSessionRepository::new(db.clone()),
            slots: SeaOrmSlotRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn sessions(&self) -> &dyn SessionRepository {
        &self.sessions
    }

    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }
}
