//! Login routes (`/api/auth`).

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, login_rate_limiter};
use crate::models::Customer;
use crate::services::CustomerService;
use crate::services::auth::{AuthService, LoginSuccess};
use crate::state::AppState;

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub customer: Customer,
}

impl From<LoginSuccess> for LoginResponse {
    fn from(success: LoginSuccess) -> Self {
        Self {
            message: "Login successful",
            token: success.token,
            customer: success.customer,
        }
    }
}

pub fn router(trust_proxy_headers: bool) -> Router<AppState> {
    let rate_limited = Router::new()
        .route("/login", post(login))
        .route_layer(login_rate_limiter(trust_proxy_headers));

    Router::new().merge(rate_limited).route("/me", get(me))
}

#[instrument(skip(state, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let success = AuthService::new(state.pool(), state.jwt_keys())
        .login(&form.email, &form.password)
        .await?;
    Ok(Json(success.into()))
}

/// The customer the bearer token was issued to.
async fn me(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<Customer>> {
    CustomerService::new(state.pool())
        .find_by_id(claims.cid)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::Unauthorized("Customer no longer exists".to_string()))
}
