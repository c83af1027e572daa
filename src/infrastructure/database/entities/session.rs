//! Parking session entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Normalized (uppercase) license plate
    pub plate: String,

    /// Vehicle type: Motorcycle, Car
    pub vehicle_type: String,

    pub is_electric: bool,

    /// Assigned slot number, 1-based
    pub slot: i32,

    pub entry_time: DateTimeUtc,

    #[sea_orm(nullable)]
    pub exit_time: Option<DateTimeUtc>,

    /// Final cost in smallest currency unit (cents), set when closed
    #[sea_orm(nullable)]
    pub cost_cents: Option<i64>,

    /// Session status: Active, Closed
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::slot::Entity")]
    Slot,
}

impl Related<super::slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
