use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One customer per e-mail; violations surface as Conflict in the service.
        manager
            .create_index(
                Index::create()
                    .name("uniq_customer_email")
                    .table(Customer::Table)
                    .col(Customer::Email)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_customer_email").table(Customer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Customer { Table, Email }
