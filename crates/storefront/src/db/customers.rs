//! Customer repository.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use ecshop_core::{CustomerId, Email};

use super::{RepositoryError, map_write_error};
use crate::models::{Customer, CustomerUpdate, NewCustomer};

const CUSTOMER_COLUMNS: &str = "customer_id, name, email, phone_number, address, city, state, \
     postal_code, country, registration_date, is_active, gender, birth_date, \
     preferred_language, loyalty_points, last_login, image, notes, created_date, \
     updated_date, is_super_admin";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    customer_id: i32,
    name: String,
    email: String,
    phone_number: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    registration_date: DateTime<Utc>,
    is_active: bool,
    gender: Option<String>,
    birth_date: Option<NaiveDate>,
    preferred_language: Option<String>,
    loyalty_points: i32,
    last_login: Option<DateTime<Utc>>,
    image: Option<Vec<u8>>,
    notes: Option<String>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
    is_super_admin: bool,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            customer_id: CustomerId::new(row.customer_id),
            name: row.name,
            email,
            phone_number: row.phone_number,
            address: row.address,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            country: row.country,
            registration_date: row.registration_date,
            is_active: row.is_active,
            gender: row.gender,
            birth_date: row.birth_date,
            preferred_language: row.preferred_language,
            loyalty_points: row.loyalty_points,
            last_login: row.last_login,
            image: row.image,
            notes: row.notes,
            created_date: row.created_date,
            updated_date: row.updated_date,
            is_super_admin: row.is_super_admin,
        })
    }
}

/// Customer together with its stored password hash. Only used for login.
#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    customer: CustomerRow,
    password_hash: String,
}

/// A customer and the argon2 PHC string to verify a login against.
pub struct CustomerCredentials {
    pub customer: Customer,
    pub password_hash: String,
}

fn collect(rows: Vec<CustomerRow>) -> Result<Vec<Customer>, RepositoryError> {
    rows.into_iter().map(Customer::try_from).collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer ORDER BY customer_id"
        ))
        .fetch_all(self.pool)
        .await?;

        collect(rows)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer WHERE customer_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(Customer::try_from)
        .transpose()
    }

    /// Get a customer by exact email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .map(Customer::try_from)
        .transpose()
    }

    /// List customers with an exact name match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer WHERE name = $1 ORDER BY customer_id"
        ))
        .bind(name)
        .fetch_all(self.pool)
        .await?;

        collect(rows)
    }

    /// List customers with an exact phone number match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.customer \
             WHERE phone_number = $1 ORDER BY customer_id"
        ))
        .bind(phone_number)
        .fetch_all(self.pool)
        .await?;

        collect(rows)
    }

    /// Get a customer and their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CustomerCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS}, password_hash FROM shop.customer WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            Ok(CustomerCredentials {
                customer: Customer::try_from(r.customer)?,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }

    /// Insert a customer with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::InvalidInput` if a value exceeds its column.
    pub async fn insert(
        &self,
        input: &NewCustomer,
        password_hash: &str,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            INSERT INTO shop.customer (
                name, email, password_hash, phone_number, address, city, state,
                postal_code, country, is_active, gender, birth_date,
                preferred_language, loyalty_points, image, notes, is_super_admin
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(input.email.as_str())
        .bind(password_hash)
        .bind(&input.phone_number)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.is_active)
        .bind(&input.gender)
        .bind(input.birth_date)
        .bind(&input.preferred_language)
        .bind(input.loyalty_points)
        .bind(&input.image)
        .bind(&input.notes)
        .bind(input.is_super_admin)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Customer::try_from(row)
    }

    /// Replace a customer's profile fields and stamp `updated_date`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    pub async fn update(
        &self,
        id: CustomerId,
        input: &CustomerUpdate,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r"
            UPDATE shop.customer
            SET
                name = $2,
                email = $3,
                phone_number = $4,
                address = $5,
                city = $6,
                state = $7,
                postal_code = $8,
                country = $9,
                gender = $10,
                preferred_language = $11,
                birth_date = $12,
                is_active = $13,
                loyalty_points = $14,
                last_login = $15,
                updated_date = NOW()
            WHERE customer_id = $1
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.email.as_str())
        .bind(&input.phone_number)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(&input.gender)
        .bind(&input.preferred_language)
        .bind(input.birth_date)
        .bind(input.is_active)
        .bind(input.loyalty_points)
        .bind(input.last_login)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Customer::try_from(row)
    }

    /// Record a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn touch_last_login(&self, id: CustomerId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE shop.customer SET last_login = NOW() WHERE customer_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Delete a customer.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if orders or cart lines still
    /// reference the customer.
    pub async fn delete_by_id(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.customer WHERE customer_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any customer is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.customer")
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected())
    }
}
