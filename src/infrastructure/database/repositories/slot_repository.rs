//! SeaORM implementation of SlotRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::slot::{Slot, SlotRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::slot;

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: slot::Model) -> Slot {
    Slot {
        number: m.number as u32,
        occupied: m.occupied,
        session_id: m.session_id,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn ensure_capacity(&self, capacity: u32) -> DomainResult<()> {
        let existing: Vec<i32> = slot::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| m.number)
            .collect();

        for number in 1..=capacity as i32 {
            if existing.contains(&number) {
                continue;
            }
            debug!("Seeding slot {}", number);
            slot::ActiveModel {
                number: Set(number),
                occupied: Set(false),
                session_id: Set(None),
            }
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        }
        Ok(())
    }

    async fn find_by_number(&self, number: u32) -> DomainResult<Option<Slot>> {
        let model = slot::Entity::find_by_id(number as i32)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_free_lowest(&self) -> DomainResult<Option<u32>> {
        let model = slot::Entity::find()
            .filter(slot::Column::Occupied.eq(false))
            .order_by_asc(slot::Column::Number)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(|m| m.number as u32))
    }

    async fn find_all(&self) -> DomainResult<Vec<Slot>> {
        let models = slot::Entity::find()
            .order_by_asc(slot::Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn set_state(
        &self,
        number: u32,
        occupied: bool,
        session_id: Option<Uuid>,
    ) -> DomainResult<()> {
        let existing = slot::Entity::find_by_id(number as i32)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(_) = existing else {
            return Err(DomainError::NotFound {
                entity: "Slot",
                field: "number",
                value: number.to_string(),
            });
        };
        slot::ActiveModel {
            number: Set(number as i32),
            occupied: Set(occupied),
            session_id: Set(session_id),
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
