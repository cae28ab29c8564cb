//! Category routes (`/api/categories`).

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use ecshop_core::CategoryId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Category, CategoryInput};
use crate::services::CategoryService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create).delete(delete_all))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/name/{name}", get(by_name))
        .route("/status/{is_active}", get(by_status))
}

async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(CategoryService::new(state.pool()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>> {
    CategoryService::new(state.pool())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state, input))]
async fn create(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = CategoryService::new(state.pool()).save(None, &input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, input))]
async fn update(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>> {
    Ok(Json(
        CategoryService::new(state.pool()).save(Some(id), &input).await?,
    ))
}

#[instrument(skip(state))]
async fn destroy(State(state): State<AppState>, Path(id): Path<CategoryId>) -> Result<StatusCode> {
    if CategoryService::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

#[instrument(skip(state, _admin))]
async fn delete_all(State(state): State<AppState>, _admin: RequireAdmin) -> Result<StatusCode> {
    let deleted = CategoryService::new(state.pool()).delete_all().await?;
    tracing::warn!(deleted, "All categories deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Category>> {
    CategoryService::new(state.pool())
        .find_by_name(&name)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

async fn by_status(
    State(state): State<AppState>,
    Path(is_active): Path<bool>,
) -> Result<Json<Vec<Category>>> {
    Ok(Json(
        CategoryService::new(state.pool())
            .find_by_is_active(is_active)
            .await?,
    ))
}
