use async_trait::async_trait;
use uuid::Uuid;

use super::domain::Customer;
use crate::errors::ServiceError;

/// Persistence gateway for customer records.
///
/// `save` is an upsert keyed by `id`. Implementations report a duplicate
/// e-mail as [`ServiceError::Conflict`]; every other store failure is
/// [`ServiceError::Repository`].
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Customer>, ServiceError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, ServiceError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<Customer>, ServiceError>;
    async fn save(&self, customer: Customer) -> Result<Customer, ServiceError>;
    async fn delete(&self, customer: &Customer) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use tokio::sync::Mutex;

    /// One entry per repository call, in arrival order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RepoCall {
        GetAll,
        GetById(Uuid),
        GetByEmail(String),
        Save(Uuid),
        Delete(Uuid),
    }

    #[derive(Default)]
    struct Inner {
        rows: Vec<Customer>, // insertion order
        // committed by another writer: invisible to reads, still held by the unique index
        hidden: Vec<Customer>,
        calls: Vec<RepoCall>,
    }

    #[derive(Default)]
    pub struct MockCustomerRepository {
        inner: Mutex<Inner>,
    }

    impl MockCustomerRepository {
        /// Insert rows directly, bypassing call recording and uniqueness.
        pub async fn seed(&self, customers: impl IntoIterator<Item = Customer>) {
            self.inner.lock().await.rows.extend(customers);
        }

        /// Rows that reads never return but `save` still collides with, as a
        /// concurrent writer's uncommitted insert would.
        pub async fn seed_hidden(&self, customers: impl IntoIterator<Item = Customer>) {
            self.inner.lock().await.hidden.extend(customers);
        }

        pub async fn calls(&self) -> Vec<RepoCall> {
            self.inner.lock().await.calls.clone()
        }

        pub async fn email_lookups(&self) -> usize {
            self.inner
                .lock()
                .await
                .calls
                .iter()
                .filter(|c| matches!(c, RepoCall::GetByEmail(_)))
                .count()
        }

        pub async fn len(&self) -> usize {
            self.inner.lock().await.rows.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }
    }

    #[async_trait]
    impl CustomerRepository for MockCustomerRepository {
        async fn get_all(&self) -> Result<Vec<Customer>, ServiceError> {
            let mut inner = self.inner.lock().await;
            inner.calls.push(RepoCall::GetAll);
            Ok(inner.rows.clone())
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>, ServiceError> {
            let mut inner = self.inner.lock().await;
            inner.calls.push(RepoCall::GetById(id));
            Ok(inner.rows.iter().find(|c| c.id == id).cloned())
        }

        async fn get_by_email(&self, email: &str) -> Result<Option<Customer>, ServiceError> {
            let mut inner = self.inner.lock().await;
            inner.calls.push(RepoCall::GetByEmail(email.to_string()));
            Ok(inner.rows.iter().find(|c| c.email == email).cloned())
        }

        async fn save(&self, customer: Customer) -> Result<Customer, ServiceError> {
            let mut inner = self.inner.lock().await;
            inner.calls.push(RepoCall::Save(customer.id));
            // mirrors the unique index on email
            let taken = inner
                .rows
                .iter()
                .chain(inner.hidden.iter())
                .any(|c| c.email == customer.email && c.id != customer.id);
            if taken {
                return Err(ServiceError::Conflict(customer.email));
            }
            match inner.rows.iter().position(|c| c.id == customer.id) {
                Some(pos) => inner.rows[pos] = customer.clone(),
                None => inner.rows.push(customer.clone()),
            }
            Ok(customer)
        }

        async fn delete(&self, customer: &Customer) -> Result<(), ServiceError> {
            let mut inner = self.inner.lock().await;
            inner.calls.push(RepoCall::Delete(customer.id));
            inner.rows.retain(|c| c.id != customer.id);
            Ok(())
        }
    }
}
