//! Order line item routes (`/api/order-details`).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use ecshop_core::{OrderDetailId, OrderId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{OrderDetail, OrderDetailInput, OrderDetailSummary};
use crate::services::OrderDetailService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create).delete(delete_all))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/order/{orders_id}", get(by_order).delete(delete_by_order))
        .route("/product/{id}", get(by_product))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<OrderDetail>>> {
    Ok(Json(OrderDetailService::new(state.pool()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrderDetailId>,
) -> Result<Json<OrderDetail>> {
    OrderDetailService::new(state.pool())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    Json(input): Json<OrderDetailInput>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    let detail = OrderDetailService::new(state.pool())
        .save(None, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrderDetailId>,
    Json(input): Json<OrderDetailInput>,
) -> Result<Json<OrderDetail>> {
    Ok(Json(
        OrderDetailService::new(state.pool())
            .save(Some(id), &input)
            .await?,
    ))
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<OrderDetailId>,
) -> Result<StatusCode> {
    if OrderDetailService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[instrument(skip(state, _admin))]
async fn delete_all(State(state): State<AppState>, _admin: RequireAdmin) -> Result<StatusCode> {
    let deleted = OrderDetailService::new(state.pool()).delete_all().await?;
    tracing::warn!(deleted, "All order details deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn by_order(
    State(state): State<AppState>,
    Path(orders_id): Path<OrderId>,
) -> Result<Json<Vec<OrderDetailSummary>>> {
    Ok(Json(
        OrderDetailService::new(state.pool())
            .find_by_order_id(orders_id)
            .await?,
    ))
}

#[instrument(skip(state))]
async fn delete_by_order(
    State(state): State<AppState>,
    Path(orders_id): Path<OrderId>,
) -> Result<StatusCode> {
    OrderDetailService::new(state.pool())
        .delete_by_order_id(orders_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn by_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<OrderDetail>>> {
    Ok(Json(
        OrderDetailService::new(state.pool())
            .find_by_products_id(id)
            .await?,
    ))
}
