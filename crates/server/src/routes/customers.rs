//! `/customer` endpoints.
//!
//! Success codes (302 for reads, 201 for create, 200 for update/delete) and
//! 208 for a taken e-mail are kept as-is for existing clients.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service::customer::CustomerView;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::state::AppState;
use crate::validation::{self, CustomerPayload, IdRule};

fn read_payload(
    state: &AppState,
    body: Result<Json<CustomerPayload>, JsonRejection>,
    id_rule: IdRule,
) -> Result<service::customer::CustomerInput, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    validation::validate(payload, id_rule, &state.validation.message_separator)
}

#[utoipa::path(
    get, path = "/customer", tag = "customer",
    responses(
        (status = 302, description = "All customers", body = [crate::openapi::CustomerDoc]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<(StatusCode, Json<Vec<CustomerView>>), ApiError> {
    debug!("find all customers");
    let customers = state.customers.list_all().await?;
    Ok((StatusCode::FOUND, Json(customers)))
}

#[utoipa::path(
    get, path = "/customer/{id}", tag = "customer",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 302, description = "Customer", body = crate::openapi::CustomerDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<(StatusCode, Json<CustomerView>), ApiError> {
    debug!(%id, "find customer by id");
    let customer = state.customers.get_by_id(id).await?;
    Ok((StatusCode::FOUND, Json(customer)))
}

#[utoipa::path(
    post, path = "/customer", tag = "customer",
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 201, description = "Created; body is the new id", body = String),
        (status = 400, description = "Validation Error"),
        (status = 208, description = "E-mail already in use")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Uuid>), ApiError> {
    let input = read_payload(&state, body, IdRule::Ignored)?;
    debug!(email = %input.email, "create customer");
    let id = state.customers.create(input).await?;
    info!(%id, "created customer");
    Ok((StatusCode::CREATED, Json(id)))
}

#[utoipa::path(
    put, path = "/customer", tag = "customer",
    request_body = crate::openapi::CustomerInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 208, description = "E-mail already in use")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    body: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let input = read_payload(&state, body, IdRule::Required)?;
    debug!(id = ?input.id, "update customer");
    state.customers.update(input).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete, path = "/customer/{id}", tag = "customer",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    debug!(%id, "delete customer");
    state.customers.delete(id).await?;
    info!(%id, "deleted customer");
    Ok(StatusCode::OK)
}
