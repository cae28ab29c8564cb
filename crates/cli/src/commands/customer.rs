//! Customer management commands.
//!
//! ```bash
//! ecshop customer create -n "Shop Admin" -e admin@example.com -p 'long-password' --admin
//! ```
//!
//! This is the only way to create an administrator; the HTTP API never sets
//! the admin flag.

use ecshop_core::Email;
use ecshop_storefront::db;
use ecshop_storefront::models::NewCustomer;
use ecshop_storefront::services::CustomerService;

use super::{CommandError, database_url};

/// Create a customer, optionally with the `ADMIN` role.
///
/// # Errors
///
/// Returns an error if the email is invalid or taken, the password is too
/// short, or the database is unreachable.
pub async fn create(
    name: &str,
    email: &str,
    password: &str,
    admin: bool,
) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|_| CommandError::InvalidEmail(email.to_owned()))?;

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;

    let input = NewCustomer {
        name: name.to_owned(),
        email,
        password: password.to_owned(),
        phone_number: None,
        address: None,
        city: None,
        state: None,
        postal_code: None,
        country: None,
        is_active: true,
        gender: None,
        birth_date: None,
        preferred_language: None,
        loyalty_points: 0,
        image: None,
        notes: None,
        is_super_admin: admin,
    };

    let customer = CustomerService::new(&pool).create(&input).await?;

    tracing::info!(
        "Customer created! ID: {}, Email: {}, Admin: {}",
        customer.customer_id,
        customer.email,
        customer.is_super_admin
    );
    Ok(())
}
