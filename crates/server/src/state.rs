use std::sync::Arc;

use configs::ValidationConfig;
use service::customer::{CustomerRepository, CustomerService};
use tracing::info_span;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService<dyn CustomerRepository>>,
    pub validation: Arc<ValidationConfig>,
}

impl AppState {
    pub fn new(repo: Arc<dyn CustomerRepository>, validation: ValidationConfig) -> Self {
        // service operation spans hang off this one rather than off the request span
        let span = info_span!("customer_service", transport = "http");
        Self {
            customers: Arc::new(CustomerService::with_span(repo, span)),
            validation: Arc::new(validation),
        }
    }
}
