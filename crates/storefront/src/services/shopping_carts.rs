//! Shopping cart service.

use sqlx::PgPool;
use tracing::instrument;

use ecshop_core::{CustomerId, ProductId, ShoppingCartId};

use crate::db::{RepositoryError, ShoppingCartRepository};
use crate::models::{ShoppingCart, ValidCartLine};

/// Shopping cart operations.
///
/// Takes [`ValidCartLine`]s only; handlers convert request bodies first.
pub struct ShoppingCartService<'a> {
    carts: ShoppingCartRepository<'a>,
}

impl<'a> ShoppingCartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: ShoppingCartRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<ShoppingCart>, RepositoryError> {
        self.carts.find_all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: ShoppingCartId,
    ) -> Result<Option<ShoppingCart>, RepositoryError> {
        self.carts.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<ShoppingCart>, RepositoryError> {
        self.carts.find_by_customer_id(customer_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_products_id(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ShoppingCart>, RepositoryError> {
        self.carts.find_by_products_id(product_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer or product does
    /// not exist.
    #[instrument(skip(self, line), fields(customer_id = %line.customer_id))]
    pub async fn add(&self, line: &ValidCartLine) -> Result<ShoppingCart, RepositoryError> {
        self.carts.save(None, line).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist.
    #[instrument(skip(self, line))]
    pub async fn update(
        &self,
        id: ShoppingCartId,
        line: &ValidCartLine,
    ) -> Result<ShoppingCart, RepositoryError> {
        self.carts.save(Some(id), line).await
    }

    /// Delete a cart line. Returns `false` if there was no such line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ShoppingCartId) -> Result<bool, RepositoryError> {
        self.carts.delete_by_id(id).await
    }

    /// Empty a customer's cart, returning the number of lines removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<u64, RepositoryError> {
        self.carts.delete_by_customer_id(customer_id).await
    }

    /// Remove a product from every cart, returning the number of lines removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete_by_products_id(&self, product_id: ProductId) -> Result<u64, RepositoryError> {
        self.carts.delete_by_products_id(product_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.carts.delete_all().await
    }
}
