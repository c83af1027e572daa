//! Create sessions table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::Plate).string().not_null())
                    .col(ColumnDef::new(Sessions::VehicleType).string().not_null())
                    .col(
                        ColumnDef::new(Sessions::IsElectric)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sessions::Slot).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::EntryTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::ExitTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Sessions::CostCents).big_integer())
                    .col(
                        ColumnDef::new(Sessions::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .to_owned(),
            )
            .await?;

        // Active-plate lookups and the active-uniqueness pre-check
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_plate")
                    .table(Sessions::Table)
                    .col(Sessions::Plate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_status")
                    .table(Sessions::Table)
                    .col(Sessions::Status)
                    .to_owned(),
            )
            .await?;

        // Daily closing window scans
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_exit_time")
                    .table(Sessions::Table)
                    .col(Sessions::ExitTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Sessions {
    Table,
    Id,
    Plate,
    VehicleType,
    IsElectric,
    Slot,
    EntryTime,
    ExitTime,
    CostCents,
    Status,
}
