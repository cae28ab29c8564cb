//! Database operations for storefront `PostgreSQL`.
//!
//! # Schema: `shop`
//!
//! ## Tables
//!
//! - `customer` - Customer accounts and login credentials
//! - `categories` - Product categories
//! - `products` - Catalog items (references `categories`)
//! - `orders` - Orders placed by customers
//! - `order_details` - Order line items (references `orders` and `products`)
//! - `payments` - One payment record per order
//! - `shopping_cart` - Cart lines per customer
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p ecshop-cli -- migrate
//! ```

pub mod categories;
pub mod customers;
pub mod order_details;
pub mod orders;
pub mod payments;
pub mod products;
pub mod shopping_carts;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use customers::CustomerRepository;
pub use order_details::OrderDetailRepository;
pub use orders::OrderRepository;
pub use payments::PaymentRepository;
pub use products::ProductRepository;
pub use shopping_carts::ShoppingCartRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (unique key, or a row still referenced elsewhere).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Value rejected by a column limit or check constraint.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Map a write failure to a repository error.
///
/// Constraint failures become `Conflict` or `InvalidInput` so callers can
/// answer 409/400 instead of 500.
pub(crate) fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(format!("duplicate value violates {constraint}"));
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict(format!(
                "referenced row missing or still in use ({constraint})"
            ));
        }
        if db_err.is_check_violation() {
            return RepositoryError::InvalidInput(format!("value violates {constraint}"));
        }
        // 22001 string_data_right_truncation, 23502 not_null_violation
        match db_err.code().as_deref() {
            Some("22001") => {
                return RepositoryError::InvalidInput("value too long for column".to_owned());
            }
            Some("23502") => {
                return RepositoryError::InvalidInput("required value missing".to_owned());
            }
            _ => {}
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
