//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server errors are captured to
//! Sentry before responding; clients only ever see a generic message for
//! them.
//!
//! Response bodies:
//! - not found: 404 with an empty body
//! - validation and conflict errors: plain-text message
//! - failed login: 400 with `{"message": ...}`

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::CartLineError;
use crate::services::auth::AuthError;
use crate::services::ecpay::EcpayError;

/// Message returned to clients for a failed login.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed: invalid email or password";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// ECPay checkout failed.
    #[error("ECPay error: {0}")]
    Ecpay(#[from] EcpayError),

    /// Resource not found.
    #[error("Not found")]
    NotFound,

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed.
    #[error("Forbidden")]
    Forbidden,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<CartLineError> for AppError {
    fn from(err: CartLineError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    /// Collapse wrapped repository errors so they map the same way everywhere.
    fn flatten(self) -> Self {
        match self {
            Self::Auth(AuthError::Repository(e)) | Self::Ecpay(EcpayError::Repository(e)) => {
                Self::Database(e)
            }
            other => other,
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(RepositoryError::Database(_) | RepositoryError::DataCorruption(_))
                | Self::Auth(AuthError::TokenSigning(_) | AuthError::PasswordHash)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let this = self.flatten();

        // Capture server errors to Sentry
        if this.is_server_error() {
            let event_id = sentry::capture_error(&this);
            tracing::error!(
                error = %this,
                sentry_event_id = %event_id,
                "Request error"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }

        match this {
            Self::NotFound
            | Self::Database(RepositoryError::NotFound)
            | Self::Ecpay(EcpayError::OrderNotFound) => StatusCode::NOT_FOUND.into_response(),
            Self::Database(RepositoryError::Conflict(msg)) => {
                (StatusCode::CONFLICT, msg).into_response()
            }
            Self::Database(RepositoryError::InvalidInput(msg)) | Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            Self::Auth(err) => auth_response(&err),
            Self::Ecpay(err) => {
                let status = match err {
                    EcpayError::AlreadyPaid | EcpayError::OrderCancelled => StatusCode::CONFLICT,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string()).into_response()
            }
            Self::Unauthorized(msg) => unauthorized(msg),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            // Server errors were answered above
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

fn auth_response(err: &AuthError) -> Response {
    match err {
        AuthError::InvalidCredentials => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": LOGIN_FAILED_MESSAGE })),
        )
            .into_response(),
        AuthError::EmailTaken => (
            StatusCode::CONFLICT,
            "An account with this email already exists",
        )
            .into_response(),
        AuthError::WeakPassword(msg) => (StatusCode::BAD_REQUEST, msg.clone()).into_response(),
        AuthError::MissingToken => unauthorized("Missing bearer token".to_string()),
        AuthError::TokenExpired => unauthorized("Token expired".to_string()),
        _ => unauthorized("Invalid token".to_string()),
    }
}

fn unauthorized(message: String) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        message,
    )
        .into_response()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated customer.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn get_body(err: AppError) -> String {
        let bytes = to_bytes(err.into_response().into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_repository_errors_map_to_client_statuses() {
        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RepositoryError::Conflict("dup".to_string()).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(RepositoryError::InvalidInput("bad".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::DataCorruption("x".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_wrapped_repository_errors_are_flattened() {
        assert_eq!(
            get_status(AuthError::Repository(RepositoryError::NotFound).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(EcpayError::Repository(RepositoryError::Conflict("x".into())).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AuthError::EmailTaken.into()), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AuthError::WeakPassword("short".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AuthError::TokenExpired.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::PasswordHash.into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_ecpay_error_statuses() {
        assert_eq!(
            get_status(EcpayError::OrderNotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(EcpayError::AlreadyPaid.into()), StatusCode::CONFLICT);
        assert_eq!(
            get_status(EcpayError::TradeNoTooLong("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let response = AppError::from(AuthError::MissingToken).into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        assert_eq!(get_body(AppError::NotFound).await, "");
        assert_eq!(get_body(RepositoryError::NotFound.into()).await, "");
    }

    #[tokio::test]
    async fn test_failed_login_body_is_json_message() {
        let body = get_body(AuthError::InvalidCredentials.into()).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(json["message"], LOGIN_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_cart_line_error_is_plain_text_400() {
        let err: AppError = CartLineError::MissingCustomer.into();
        assert_eq!(get_body(err).await, "Invalid customer ID");
    }

    #[tokio::test]
    async fn test_server_error_details_are_hidden() {
        let body = get_body(RepositoryError::DataCorruption("secret detail".into()).into()).await;
        assert_eq!(body, "Internal server error");
    }
}
