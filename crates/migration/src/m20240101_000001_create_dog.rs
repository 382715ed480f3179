//! Create `dog` table.
//! One row per dog on the roster; rows are soft-deleted through `date_deleted`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dog::Table)
                    .if_not_exists()
                    .col(pk_auto(Dog::Id))
                    .col(string_len(Dog::Name, 128).not_null())
                    .col(string_len(Dog::Breed, 128).not_null())
                    .col(string_len(Dog::Supplier, 256).not_null().default(""))
                    .col(integer(Dog::BadgeId).not_null())
                    .col(string_len(Dog::Gender, 32).not_null().default(""))
                    .col(ColumnDef::new(Dog::BirthDate).date().null())
                    .col(ColumnDef::new(Dog::DateAcquired).date().null())
                    .col(string_len(Dog::Status, 32).not_null())
                    .col(ColumnDef::new(Dog::LeavingDate).date().null())
                    .col(string_len(Dog::LeavingReason, 64).not_null().default(""))
                    .col(text(Dog::KennelingCharacteristics).not_null().default(""))
                    // NULL marks an active row
                    .col(ColumnDef::new(Dog::DateDeleted).date().null())
                    .to_owned(),
            )
            .await?;

        // Backstop for the badge uniqueness check done by the service
        manager
            .create_index(
                Index::create()
                    .name("idx_dog_badge_id_unique")
                    .table(Dog::Table)
                    .col(Dog::BadgeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dog_date_deleted")
                    .table(Dog::Table)
                    .col(Dog::DateDeleted)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Dog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Dog {
    Table,
    Id,
    Name,
    Breed,
    Supplier,
    BadgeId,
    Gender,
    BirthDate,
    DateAcquired,
    Status,
    LeavingDate,
    LeavingReason,
    KennelingCharacteristics,
    DateDeleted,
}
