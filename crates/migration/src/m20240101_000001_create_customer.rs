//! Create `customer` table.
//!
//! `id` is assigned by the application; there is no soft-delete column.
//! Column widths match `models::customer::MAX_NAME_LEN` / `MAX_EMAIL_LEN`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(uuid(Customer::Id).primary_key())
                    .col(string_len(Customer::FirstName, 255).not_null())
                    .col(string_len(Customer::LastName, 255).not_null())
                    .col(string_len(Customer::Email, 320).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Customer::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, Id, FirstName, LastName, Email }
