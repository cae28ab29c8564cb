//! Customer account service.

use sqlx::PgPool;
use tracing::instrument;

use ecshop_core::CustomerId;

use super::auth::{AuthError, hash_password, validate_password};
use crate::db::{CustomerRepository, RepositoryError};
use crate::models::{Customer, CustomerUpdate, NewCustomer};

/// Customer account operations.
pub struct CustomerService<'a> {
    customers: CustomerRepository<'a>,
}

impl<'a> CustomerService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        self.customers.find_all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        self.customers.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        self.customers.find_by_email(email.trim()).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Customer>, RepositoryError> {
        self.customers.find_by_name(name).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Vec<Customer>, RepositoryError> {
        self.customers.find_by_phone_number(phone_number).await
    }

    /// Register a customer, storing an Argon2id hash of the password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short, or
    /// `AuthError::EmailTaken` if the email is already registered.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: &NewCustomer) -> Result<Customer, AuthError> {
        validate_password(&input.password)?;
        let password_hash = hash_password(&input.password)?;

        let customer = self
            .customers
            .insert(input, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(customer_id = %customer.customer_id, "Customer created");
        Ok(customer)
    }

    /// Replace a customer's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: CustomerId,
        input: &CustomerUpdate,
    ) -> Result<Customer, RepositoryError> {
        self.customers.update(id, input).await
    }

    /// Delete a customer. Returns `false` if there was no such customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if orders or cart lines still
    /// reference the customer.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let deleted = self.customers.delete_by_id(id).await?;
        if deleted {
            tracing::info!(customer_id = %id, "Customer deleted");
        }
        Ok(deleted)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any customer is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.customers.delete_all().await
    }
}
