//! Customer domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use ecshop_core::{CustomerId, Email};

use super::{default_true, image_base64};

/// A customer account.
///
/// The password hash never leaves the repository layer; it is not part of
/// this type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub is_active: bool,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub preferred_language: Option<String>,
    pub loyalty_points: i32,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(with = "image_base64")]
    pub image: Option<Vec<u8>>,
    pub notes: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
    pub is_super_admin: bool,
}

/// Registration input (`POST /api/customers`).
///
/// `is_super_admin` cannot be set over HTTP; the CLI sets it when
/// bootstrapping administrators.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    /// Plaintext password, hashed before it reaches the database.
    pub password: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub loyalty_points: i32,
    #[serde(default, with = "image_base64")]
    pub image: Option<Vec<u8>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(skip)]
    pub is_super_admin: bool,
}

impl std::fmt::Debug for NewCustomer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCustomer")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("is_super_admin", &self.is_super_admin)
            .finish_non_exhaustive()
    }
}

/// Profile update (`PUT /api/customers/{id}`).
///
/// Replaces every listed field. Password, image, notes and the admin flag
/// are not changed through this path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub loyalty_points: i32,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}
