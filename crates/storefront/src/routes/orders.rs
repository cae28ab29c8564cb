//! Order routes (`/api/orders`).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use ecshop_core::{CustomerId, OrderId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewOrder, Order, OrderPatch};
use crate::services::OrderService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create).delete(delete_all))
        .route("/last", get(last))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/customer/{id}", get(by_customer))
        .route("/status/cancelled/{is_cancelled}", get(by_cancelled))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(OrderService::new(state.pool()).find_all().await?))
}

async fn show(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    OrderService::new(state.pool())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// ID of the most recent order, as a bare JSON number.
async fn last(State(state): State<AppState>) -> Result<Json<OrderId>> {
    OrderService::new(state.pool())
        .last()
        .await?
        .map(|order| Json(order.orders_id))
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = OrderService::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Only fields present in the body are changed.
#[instrument(skip(state, patch))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>> {
    Ok(Json(OrderService::new(state.pool()).update(id, &patch).await?))
}

#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<StatusCode> {
    if OrderService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[instrument(skip(state, _admin))]
async fn delete_all(State(state): State<AppState>, _admin: RequireAdmin) -> Result<StatusCode> {
    let deleted = OrderService::new(state.pool()).delete_all().await?;
    tracing::warn!(deleted, "All orders deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn by_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(
        OrderService::new(state.pool())
            .find_by_customer_id(id)
            .await?,
    ))
}

async fn by_cancelled(
    State(state): State<AppState>,
    Path(is_cancelled): Path<bool>,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(
        OrderService::new(state.pool())
            .find_by_is_cancelled(is_cancelled)
            .await?,
    ))
}
