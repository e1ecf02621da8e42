use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Customer with id {0} not found")]
    NotFound(Uuid),
    #[error("Customer with e-mail: {0} already exists")]
    Conflict(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl ServiceError {
    pub fn repository(err: impl std::fmt::Display) -> Self { Self::Repository(err.to_string()) }
}
