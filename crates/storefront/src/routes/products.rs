//! Product routes (`/api/products`).
//!
//! `PUT /{id}` leaves the stored image alone; `POST /{id}` replaces it when
//! the body carries one.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use ecshop_core::{CategoryId, ProductId};

use crate::db::products::ImageUpdate;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::services::ProductService;
use crate::state::AppState;

/// Query for `GET /api/products/price`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    #[serde(alias = "min")]
    pub min_price: Decimal,
    #[serde(alias = "max")]
    pub max_price: Decimal,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create).delete(delete_all))
        .route(
            "/{id}",
            get(show).put(update).post(update_with_image).delete(destroy),
        )
        .route("/{id}/update-stock", put(update_stock))
        .route("/name/{name}", get(by_name))
        .route("/category/{id}", get(by_category))
        .route("/price", get(by_price))
        .route("/featured", get(featured))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(ProductService::new(state.pool()).find_all().await?))
}

async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Product>> {
    ProductService::new(state.pool())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductService::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    Ok(Json(
        ProductService::new(state.pool())
            .update(id, &input, ImageUpdate::Keep)
            .await?,
    ))
}

#[instrument(skip(state, input))]
async fn update_with_image(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    Ok(Json(
        ProductService::new(state.pool())
            .update(id, &input, ImageUpdate::ReplaceIfPresent)
            .await?,
    ))
}

/// Body is a bare JSON integer.
#[instrument(skip(state))]
async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(quantity_in_stock): Json<i32>,
) -> Result<Json<Product>> {
    Ok(Json(
        ProductService::new(state.pool())
            .update_stock(id, quantity_in_stock)
            .await?,
    ))
}

#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<StatusCode> {
    if ProductService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[instrument(skip(state, _admin))]
async fn delete_all(State(state): State<AppState>, _admin: RequireAdmin) -> Result<StatusCode> {
    let deleted = ProductService::new(state.pool()).delete_all().await?;
    tracing::warn!(deleted, "All products deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn by_name(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<Product>> {
    ProductService::new(state.pool())
        .find_by_name(&name)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn by_category(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(
        ProductService::new(state.pool())
            .find_by_category_id(id)
            .await?,
    ))
}

async fn by_price(
    State(state): State<AppState>,
    Query(range): Query<PriceRange>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(
        ProductService::new(state.pool())
            .find_by_price_range(range.min_price, range.max_price)
            .await?,
    ))
}

async fn featured(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(ProductService::new(state.pool()).find_featured().await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Uri;

    use super::*;

    fn parse(query: &str) -> Option<PriceRange> {
        let uri: Uri = format!("/api/products/price?{query}").parse().unwrap();
        Query::<PriceRange>::try_from_uri(&uri).ok().map(|Query(range)| range)
    }

    #[test]
    fn test_price_range_accepts_both_spellings() {
        let long = parse("minPrice=10&maxPrice=99.50").unwrap();
        assert_eq!(long.min_price, Decimal::new(10, 0));
        assert_eq!(long.max_price, Decimal::new(9950, 2));

        let short = parse("min=1&max=2").unwrap();
        assert_eq!(short.min_price, Decimal::new(1, 0));
        assert_eq!(short.max_price, Decimal::new(2, 0));
    }

    #[test]
    fn test_price_range_requires_both_bounds() {
        assert!(parse("minPrice=10").is_none());
        assert!(parse("minPrice=ten&maxPrice=20").is_none());
    }
}
