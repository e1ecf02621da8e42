use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// Failures surfaced by the HTTP layer. Bodies are plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rendered field violations, see [`crate::validation`].
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    MalformedBody(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::Conflict(_)) => StatusCode::ALREADY_REPORTED,
            ApiError::Service(ServiceError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Service(ServiceError::Repository(_)) => {
                error!(error = %self, "store failure");
                "Internal server error".to_string()
            }
            _ => {
                debug!(%status, error = %self, "request rejected");
                self.to_string()
            }
        };
        (status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
