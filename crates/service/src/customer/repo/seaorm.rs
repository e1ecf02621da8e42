use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::warn;
use uuid::Uuid;

use models::customer;

use crate::customer::domain::Customer;
use crate::customer::repository::CustomerRepository;
use crate::errors::ServiceError;

/// SeaORM-backed repository implementation.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn map_write_err(err: DbErr, email: &str) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            warn!(%email, %detail, "unique constraint rejected customer write");
            ServiceError::Conflict(email.to_string())
        }
        _ => ServiceError::repository(err),
    }
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn get_all(&self) -> Result<Vec<Customer>, ServiceError> {
        let rows = customer::Entity::find()
            .order_by_asc(customer::Column::LastName)
            .all(&self.db)
            .await
            .map_err(ServiceError::repository)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, ServiceError> {
        let found = customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ServiceError::repository)?;
        Ok(found.map(Customer::from))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Customer>, ServiceError> {
        let found = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(ServiceError::repository)?;
        Ok(found.map(Customer::from))
    }

    async fn save(&self, c: Customer) -> Result<Customer, ServiceError> {
        let am = customer::ActiveModel {
            id: Set(c.id),
            first_name: Set(c.first_name.clone()),
            last_name: Set(c.last_name.clone()),
            email: Set(c.email.clone()),
        };
        // single-statement upsert keyed by id
        customer::Entity::insert(am)
            .on_conflict(
                OnConflict::column(customer::Column::Id)
                    .update_columns([
                        customer::Column::FirstName,
                        customer::Column::LastName,
                        customer::Column::Email,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_err(e, &c.email))?;
        Ok(c)
    }

    async fn delete(&self, c: &Customer) -> Result<(), ServiceError> {
        let model = customer::Model {
            id: c.id,
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            email: c.email.clone(),
        };
        model.delete(&self.db).await.map_err(ServiceError::repository)?;
        Ok(())
    }
}
