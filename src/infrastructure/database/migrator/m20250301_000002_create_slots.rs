//! Create slots table

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_sessions::Sessions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Slots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Slots::Number)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Slots::Occupied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Slots::SessionId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_slots_session")
                            .from(Slots::Table, Slots::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Slots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Slots {
    Table,
    Number,
    Occupied,
    SessionId,
}
