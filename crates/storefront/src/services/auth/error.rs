//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or an unreadable stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Another customer already uses this email.
    #[error("email already registered")]
    EmailTaken,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// No bearer token on a request that needs one.
    #[error("missing bearer token")]
    MissingToken,

    /// Token signature, format or claims are invalid.
    #[error("invalid token")]
    InvalidToken,

    /// Token is past its `exp` claim.
    #[error("token expired")]
    TokenExpired,

    /// Token could not be signed.
    #[error("token signing failed: {0}")]
    TokenSigning(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
