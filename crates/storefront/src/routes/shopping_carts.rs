//! Shopping cart routes (`/api/shopping-carts`).
//!
//! Request bodies must name both a customer and a product; a missing ID is a
//! 400 with a plain-text reason.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use ecshop_core::{CustomerId, ProductId, ShoppingCartId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{ShoppingCart, ShoppingCartInput, ValidCartLine};
use crate::services::ShoppingCartService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create).delete(delete_all))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route(
            "/customer/{id}",
            get(by_customer).delete(delete_by_customer),
        )
        .route("/product/{id}", get(by_product).delete(delete_by_product))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<ShoppingCart>>> {
    Ok(Json(ShoppingCartService::new(state.pool()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<ShoppingCartId>,
) -> Result<Json<ShoppingCart>> {
    ShoppingCartService::new(state.pool())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    Json(input): Json<ShoppingCartInput>,
) -> Result<(StatusCode, Json<ShoppingCart>)> {
    let line = ValidCartLine::try_from(input)?;
    let cart = ShoppingCartService::new(state.pool()).add(&line).await?;
    Ok((StatusCode::CREATED, Json(cart)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<ShoppingCartId>,
    Json(input): Json<ShoppingCartInput>,
) -> Result<Json<ShoppingCart>> {
    let line = ValidCartLine::try_from(input)?;
    Ok(Json(
        ShoppingCartService::new(state.pool())
            .update(id, &line)
            .await?,
    ))
}

#[instrument(skip(state))]
async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ShoppingCartId>,
) -> Result<StatusCode> {
    if ShoppingCartService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[instrument(skip(state, _admin))]
async fn delete_all(State(state): State<AppState>, _admin: RequireAdmin) -> Result<StatusCode> {
    let deleted = ShoppingCartService::new(state.pool()).delete_all().await?;
    tracing::warn!(deleted, "All cart lines deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn by_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Vec<ShoppingCart>>> {
    Ok(Json(
        ShoppingCartService::new(state.pool())
            .find_by_customer_id(id)
            .await?,
    ))
}

#[instrument(skip(state))]
async fn delete_by_customer(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<StatusCode> {
    ShoppingCartService::new(state.pool())
        .delete_by_customer_id(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn by_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<ShoppingCart>>> {
    Ok(Json(
        ShoppingCartService::new(state.pool())
            .find_by_products_id(id)
            .await?,
    ))
}

#[instrument(skip(state))]
async fn delete_by_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ShoppingCartService::new(state.pool())
        .delete_by_products_id(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
