//! SeaORM implementation of SessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::session::{
    ParkingSession, SessionFilter, SessionRepository, SessionStatus, VehicleType,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::session;

pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: session::Model) -> ParkingSession {
    ParkingSession {
        id: m.id,
        plate: m.plate,
        vehicle_type: VehicleType::from_str(&m.vehicle_type).unwrap_or(VehicleType::Car),
        is_electric: m.is_electric,
        slot: m.slot as u32,
        entry_time: m.entry_time,
        exit_time: m.exit_time,
        cost_cents: m.cost_cents,
        status: SessionStatus::from_str(&m.status).unwrap_or(SessionStatus::Closed),
    }
}

fn domain_to_active(s: &ParkingSession) -> session::ActiveModel {
    session::ActiveModel {
        id: Set(s.id),
        plate: Set(s.plate.clone()),
        vehicle_type: Set(s.vehicle_type.as_str().to_string()),
        is_electric: Set(s.is_electric),
        slot: Set(s.slot as i32),
        entry_time: Set(s.entry_time),
        exit_time: Set(s.exit_time),
        cost_cents: Set(s.cost_cents),
        status: Set(s.status.as_str().to_string()),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

// ── SessionRepository impl ──────────────────────────────────────

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn insert(&self, s: ParkingSession) -> DomainResult<()> {
        debug!("Inserting session {} (plate {})", s.id, s.plate);
        domain_to_active(&s).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<ParkingSession>> {
        let model = session::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_active_by_plate(&self, plate: &str) -> DomainResult<Option<ParkingSession>> {
        let model = session::Entity::find()
            .filter(session::Column::Plate.eq(plate))
            .filter(session::Column::Status.eq(SessionStatus::Active.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_page(
        &self,
        filter: &SessionFilter,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<ParkingSession>, u64)> {
        let mut query = session::Entity::find();
        if let Some(ref needle) = filter.plate_contains {
            // Plates are stored uppercase, so uppercasing the needle makes
            // the substring match case-insensitive.
            query = query.filter(session::Column::Plate.contains(needle.to_uppercase()));
        }
        let paginator = query
            .order_by_desc(session::Column::EntryTime)
            .order_by_asc(session::Column::Id)
            .paginate(&self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;

        Ok((items.into_iter().map(model_to_domain).collect(), total))
    }

    async fn update(&self, s: ParkingSession) -> DomainResult<()> {
        debug!("Updating session {}", s.id);
        let existing = session::Entity::find_by_id(s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: s.id.to_string(),
            });
        }
        domain_to_active(&s).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        debug!("Deleting session {}", id);
        let existing = session::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: id.to_string(),
            });
        };
        existing.delete(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_closed_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<ParkingSession>> {
        let models = session::Entity::find()
            .filter(session::Column::Status.eq(SessionStatus::Closed.as_str()))
            .filter(session::Column::ExitTime.gte(start))
            .filter(session::Column::ExitTime.lt(end))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_active(&self) -> DomainResult<Vec<ParkingSession>> {
        let models = session::Entity::find()
            .filter(session::Column::Status.eq(SessionStatus::Active.as_str()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
