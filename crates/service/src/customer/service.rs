use std::sync::Arc;

use tracing::{debug, info, info_span, instrument, Span};
use uuid::Uuid;

use super::domain::{CustomerInput, CustomerView};
use super::mapper;
use super::repository::CustomerRepository;
use crate::errors::ServiceError;

/// Customer business service independent of web framework.
///
/// Owns the two rules of the domain: an e-mail belongs to at most one
/// customer, and mutations require an existing record. The store's unique
/// index backs the first rule when concurrent writers race past the check.
pub struct CustomerService<R: CustomerRepository + ?Sized> {
    repo: Arc<R>,
    span: Span,
}

impl<R: CustomerRepository + ?Sized> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_span(repo, info_span!("customer_service"))
    }

    /// Operation spans are parented to `span` rather than to whatever is current.
    pub fn with_span(repo: Arc<R>, span: Span) -> Self { Self { repo, span } }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn list_all(&self) -> Result<Vec<CustomerView>, ServiceError> {
        let rows = self.repo.get_all().await?;
        debug!(count = rows.len(), "customers listed");
        Ok(rows.into_iter().map(mapper::to_view).collect())
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<CustomerView, ServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .map(mapper::to_view)
            .ok_or(ServiceError::NotFound(id))
    }

    /// Create a customer and return its freshly assigned id.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{CustomerService, CustomerInput, repository::mock::MockCustomerRepository};
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(MockCustomerRepository::default()));
    /// let input = CustomerInput { id: None, first_name: "Ada".into(), last_name: "Lovelace".into(), email: "ada@example.com".into() };
    /// let id = tokio_test::block_on(svc.create(input)).unwrap();
    /// let view = tokio_test::block_on(svc.get_by_id(id)).unwrap();
    /// assert_eq!(view.email, "ada@example.com");
    /// ```
    #[instrument(parent = &self.span, skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: CustomerInput) -> Result<Uuid, ServiceError> {
        self.ensure_email_free(&input.email).await?;
        let record = mapper::to_record(Uuid::new_v4(), input);
        let saved = self.repo.save(record).await?;
        info!(customer_id = %saved.id, "customer_created");
        Ok(saved.id)
    }

    /// Replace name and e-mail of the customer identified by `input.id`.
    ///
    /// The uniqueness check only runs when the e-mail actually changes, so
    /// re-saving a record with its own address never conflicts.
    #[instrument(parent = &self.span, skip(self, input), fields(customer_id = ?input.id))]
    pub async fn update(&self, input: CustomerInput) -> Result<(), ServiceError> {
        // a missing id cannot resolve to a record
        let Some(id) = input.id else { return Err(ServiceError::NotFound(Uuid::nil())) };
        let mut customer = self.repo.get_by_id(id).await?.ok_or(ServiceError::NotFound(id))?;

        if input.email != customer.email {
            self.ensure_email_free(&input.email).await?;
        }

        mapper::merge(&mut customer, input);
        self.repo.save(customer).await?;
        info!(customer_id = %id, "customer_updated");
        Ok(())
    }

    #[instrument(parent = &self.span, skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let customer = self.repo.get_by_id(id).await?.ok_or(ServiceError::NotFound(id))?;
        self.repo.delete(&customer).await?;
        info!(customer_id = %id, "customer_deleted");
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), ServiceError> {
        if let Some(owner) = self.repo.get_by_email(email).await? {
            debug!(owner_id = %owner.id, "email already taken");
            return Err(ServiceError::Conflict(owner.email));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::domain::Customer;
    use crate::customer::repository::mock::{MockCustomerRepository, RepoCall};

    fn input(first: &str, last: &str, email: &str) -> CustomerInput {
        CustomerInput { id: None, first_name: first.into(), last_name: last.into(), email: email.into() }
    }

    fn service() -> (Arc<MockCustomerRepository>, CustomerService<MockCustomerRepository>) {
        let repo = Arc::new(MockCustomerRepository::default());
        (repo.clone(), CustomerService::new(repo))
    }

    #[tokio::test]
    async fn create_then_get_returns_matching_fields() {
        let (_, svc) = service();
        let id = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        let view = svc.get_by_id(id).await.unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.first_name, "Ada");
        assert_eq!(view.last_name, "Lovelace");
        assert_eq!(view.email, "ada@example.com");
    }

    #[tokio::test]
    async fn create_ignores_supplied_id() {
        let (_, svc) = service();
        let supplied = Uuid::new_v4();
        let mut i = input("Ada", "Lovelace", "ada@example.com");
        i.id = Some(supplied);
        let id = svc.create(i).await.unwrap();
        assert_ne!(id, supplied);
        assert!(matches!(svc.get_by_id(supplied).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_with_taken_email_conflicts_and_persists_nothing() {
        let (repo, svc) = service();
        svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        let err = svc.create(input("Other", "Person", "ada@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref e) if e == "ada@example.com"));
        assert_eq!(err.to_string(), "Customer with e-mail: ada@example.com already exists");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let (_, svc) = service();
        let id = Uuid::new_v4();
        assert!(matches!(svc.get_by_id(id).await, Err(ServiceError::NotFound(x)) if x == id));
        let mut upd = input("Ada", "Lovelace", "ada@example.com");
        upd.id = Some(id);
        assert!(matches!(svc.update(upd).await, Err(ServiceError::NotFound(x)) if x == id));
        assert!(matches!(svc.delete(id).await, Err(ServiceError::NotFound(x)) if x == id));
        assert_eq!(
            svc.delete(id).await.unwrap_err().to_string(),
            format!("Customer with id {id} not found")
        );
    }

    #[tokio::test]
    async fn update_without_id_is_not_found() {
        let (_, svc) = service();
        svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        let err = svc.update(input("Ada", "Lovelace", "ada@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_with_unchanged_email_skips_uniqueness_check() {
        let (repo, svc) = service();
        let id = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        let lookups_after_create = repo.email_lookups().await;

        let mut upd = input("Augusta", "King", "ada@example.com");
        upd.id = Some(id);
        svc.update(upd).await.unwrap();

        assert_eq!(repo.email_lookups().await, lookups_after_create);
        let view = svc.get_by_id(id).await.unwrap();
        assert_eq!(view.first_name, "Augusta");
        assert_eq!(view.last_name, "King");
    }

    #[tokio::test]
    async fn update_to_colliding_email_conflicts_and_leaves_record() {
        let (_, svc) = service();
        let a = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        svc.create(input("Grace", "Hopper", "grace@example.com")).await.unwrap();

        let mut upd = input("Ada", "Byron", "grace@example.com");
        upd.id = Some(a);
        assert!(matches!(svc.update(upd).await, Err(ServiceError::Conflict(_))));

        let view = svc.get_by_id(a).await.unwrap();
        assert_eq!(view.last_name, "Lovelace");
        assert_eq!(view.email, "ada@example.com");
    }

    #[tokio::test]
    async fn store_level_duplicate_surfaces_as_conflict() {
        // a record inserted behind the service's back, as a concurrent writer would
        let (repo, svc) = service();
        let id = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        let racer = Customer {
            id: Uuid::new_v4(),
            first_name: "Racer".into(),
            last_name: "X".into(),
            email: "ada@example.com".into(),
        };
        let err = repo.save(racer).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(svc.list_all().await.unwrap().len(), 1);
        assert_eq!(svc.list_all().await.unwrap()[0].id, id);
    }

    #[tokio::test]
    async fn create_reports_conflict_when_store_rejects_after_read_check() {
        let (repo, svc) = service();
        repo.seed_hidden([Customer {
            id: Uuid::new_v4(),
            first_name: "Racer".into(),
            last_name: "X".into(),
            email: "ada@example.com".into(),
        }])
        .await;

        let err = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref e) if e == "ada@example.com"));
        assert_eq!(err.to_string(), "Customer with e-mail: ada@example.com already exists");

        // the read check passed and the write was attempted
        let calls = repo.calls().await;
        assert!(calls.contains(&RepoCall::GetByEmail("ada@example.com".into())));
        assert!(matches!(calls.last(), Some(RepoCall::Save(_))));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn update_reports_conflict_when_store_rejects_after_read_check() {
        let (repo, svc) = service();
        let id = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        repo.seed_hidden([Customer {
            id: Uuid::new_v4(),
            first_name: "Racer".into(),
            last_name: "X".into(),
            email: "grace@example.com".into(),
        }])
        .await;

        let mut upd = input("Ada", "Lovelace", "grace@example.com");
        upd.id = Some(id);
        assert!(matches!(svc.update(upd).await, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.get_by_id(id).await.unwrap().email, "ada@example.com");
    }

    #[tokio::test]
    async fn injected_span_does_not_change_results() {
        let repo = Arc::new(MockCustomerRepository::default());
        let svc = CustomerService::with_span(repo.clone(), info_span!("customer_service", transport = "test"));
        let id = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        assert_eq!(svc.list_all().await.unwrap().len(), 1);
        svc.delete(id).await.unwrap();
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let (repo, svc) = service();
        let id = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        svc.delete(id).await.unwrap();
        assert!(repo.is_empty().await);
        assert_eq!(repo.calls().await.last(), Some(&RepoCall::Delete(id)));
    }

    #[tokio::test]
    async fn list_all_returns_every_customer() {
        let (repo, svc) = service();
        repo.seed([
            Customer { id: Uuid::new_v4(), first_name: "A".into(), last_name: "A".into(), email: "a@example.com".into() },
            Customer { id: Uuid::new_v4(), first_name: "B".into(), last_name: "B".into(), email: "b@example.com".into() },
        ])
        .await;
        let all = svc.list_all().await.unwrap();
        let mut emails: Vec<_> = all.iter().map(|v| v.email.as_str()).collect();
        emails.sort_unstable();
        assert_eq!(emails, ["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn alice_bob_scenario() {
        let (_, svc) = service();
        let id1 = svc.create(input("Alice", "Smith", "alice@example.com")).await.unwrap();
        assert!(matches!(
            svc.create(input("Bob", "Jones", "alice@example.com")).await,
            Err(ServiceError::Conflict(_))
        ));

        let mut upd = input("Alice", "Smith", "bob@example.com");
        upd.id = Some(id1);
        svc.update(upd).await.unwrap();
        assert_eq!(svc.get_by_id(id1).await.unwrap().email, "bob@example.com");

        svc.delete(id1).await.unwrap();
        assert!(matches!(svc.get_by_id(id1).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let repo: Arc<dyn CustomerRepository> = Arc::new(MockCustomerRepository::default());
        let svc: CustomerService<dyn CustomerRepository> = CustomerService::new(repo);
        let id = svc.create(input("Ada", "Lovelace", "ada@example.com")).await.unwrap();
        assert_eq!(svc.get_by_id(id).await.unwrap().first_name, "Ada");
    }
}
