//! Customer routes (`/api/customers`).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use ecshop_core::CustomerId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Customer, CustomerUpdate, NewCustomer};
use crate::services::CustomerService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create).delete(delete_all))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/email/{email}", get(by_email))
        .route("/name/{name}", get(by_name))
        .route("/phone/{phone}", get(by_phone))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    Ok(Json(CustomerService::new(state.pool()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>> {
    CustomerService::new(state.pool())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>)> {
    let customer = CustomerService::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(input): Json<CustomerUpdate>,
) -> Result<Json<Customer>> {
    Ok(Json(CustomerService::new(state.pool()).update(id, &input).await?))
}

#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<CustomerId>) -> Result<StatusCode> {
    if CustomerService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[instrument(skip(state, _admin))]
async fn delete_all(State(state): State<AppState>, _admin: RequireAdmin) -> Result<StatusCode> {
    let deleted = CustomerService::new(state.pool()).delete_all().await?;
    tracing::warn!(deleted, "All customers deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Customer>> {
    CustomerService::new(state.pool())
        .find_by_email(&email)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Customer>>> {
    Ok(Json(CustomerService::new(state.pool()).find_by_name(&name).await?))
}

async fn by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<Vec<Customer>>> {
    Ok(Json(
        CustomerService::new(state.pool())
            .find_by_phone_number(&phone)
            .await?,
    ))
}
