//! Payment record routes (`/api/payments`).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use ecshop_core::{OrderId, PaymentId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Payment, PaymentInput};
use crate::services::PaymentService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create).delete(delete_all))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/order/{orders_id}", get(by_order).delete(delete_by_order))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<Payment>>> {
    Ok(Json(PaymentService::new(state.pool()).find_all().await?))
}

async fn show(State(state): State<AppState>, Path(id): Path<PaymentId>) -> Result<Json<Payment>> {
    PaymentService::new(state.pool())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    Json(input): Json<PaymentInput>,
) -> Result<(StatusCode, Json<Payment>)> {
    let payment = PaymentService::new(state.pool()).save(None, &input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<PaymentId>,
    Json(input): Json<PaymentInput>,
) -> Result<Json<Payment>> {
    Ok(Json(
        PaymentService::new(state.pool()).save(Some(id), &input).await?,
    ))
}

#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<PaymentId>) -> Result<StatusCode> {
    if PaymentService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[instrument(skip(state, _admin))]
async fn delete_all(State(state): State<AppState>, _admin: RequireAdmin) -> Result<StatusCode> {
    let deleted = PaymentService::new(state.pool()).delete_all().await?;
    tracing::warn!(deleted, "All payments deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn by_order(
    State(state): State<AppState>,
    Path(orders_id): Path<OrderId>,
) -> Result<Json<Payment>> {
    PaymentService::new(state.pool())
        .find_by_order_id(orders_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state))]
async fn delete_by_order(
    State(state): State<AppState>,
    Path(orders_id): Path<OrderId>,
) -> Result<StatusCode> {
    PaymentService::new(state.pool())
        .delete_by_order_id(orders_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
