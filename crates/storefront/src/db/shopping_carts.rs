//! Shopping cart repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ecshop_core::{CustomerId, ProductId, ShoppingCartId};

use super::{RepositoryError, map_write_error};
use crate::models::{ShoppingCart, ValidCartLine};

const CART_COLUMNS: &str =
    "shopping_cart_id, customer_id, products_id, quantity, date_added, account_paid, notes";

#[derive(Debug, sqlx::FromRow)]
struct ShoppingCartRow {
    shopping_cart_id: i32,
    customer_id: i32,
    products_id: i32,
    quantity: i32,
    date_added: DateTime<Utc>,
    account_paid: bool,
    notes: Option<String>,
}

impl From<ShoppingCartRow> for ShoppingCart {
    fn from(row: ShoppingCartRow) -> Self {
        Self {
            shopping_cart_id: ShoppingCartId::new(row.shopping_cart_id),
            customer_id: CustomerId::new(row.customer_id),
            products_id: ProductId::new(row.products_id),
            quantity: row.quantity,
            date_added: row.date_added,
            account_paid: row.account_paid,
            notes: row.notes,
        }
    }
}

/// Repository for shopping cart database operations.
pub struct ShoppingCartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShoppingCartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<ShoppingCart>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShoppingCartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM shop.shopping_cart ORDER BY shopping_cart_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ShoppingCart::from).collect())
    }

    /// Get a cart line by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: ShoppingCartId,
    ) -> Result<Option<ShoppingCart>, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingCartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM shop.shopping_cart WHERE shopping_cart_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ShoppingCart::from))
    }

    /// List a customer's cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<ShoppingCart>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShoppingCartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM shop.shopping_cart \
             WHERE customer_id = $1 ORDER BY shopping_cart_id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ShoppingCart::from).collect())
    }

    /// List cart lines holding a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_products_id(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ShoppingCart>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShoppingCartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM shop.shopping_cart \
             WHERE products_id = $1 ORDER BY shopping_cart_id"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ShoppingCart::from).collect())
    }

    /// Insert a new cart line, or rewrite an existing one when `id` is given.
    ///
    /// Updating keeps `account_paid` and `notes` as stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist.
    /// Returns `RepositoryError::Conflict` if the customer or product does not exist.
    pub async fn save(
        &self,
        id: Option<ShoppingCartId>,
        line: &ValidCartLine,
    ) -> Result<ShoppingCart, RepositoryError> {
        match id {
            None => self.insert(line).await,
            Some(id) => self.update(id, line).await,
        }
    }

    async fn insert(&self, line: &ValidCartLine) -> Result<ShoppingCart, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingCartRow>(&format!(
            r"
            INSERT INTO shop.shopping_cart (
                customer_id, products_id, quantity, date_added, account_paid, notes
            )
            VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6)
            RETURNING {CART_COLUMNS}
            "
        ))
        .bind(line.customer_id)
        .bind(line.products_id)
        .bind(line.quantity)
        .bind(line.date_added)
        .bind(line.account_paid)
        .bind(&line.notes)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: ShoppingCartId,
        line: &ValidCartLine,
    ) -> Result<ShoppingCart, RepositoryError> {
        let row = sqlx::query_as::<_, ShoppingCartRow>(&format!(
            r"
            UPDATE shop.shopping_cart
            SET
                customer_id = $2,
                products_id = $3,
                quantity = $4,
                date_added = COALESCE($5, date_added)
            WHERE shopping_cart_id = $1
            RETURNING {CART_COLUMNS}
            "
        ))
        .bind(id)
        .bind(line.customer_id)
        .bind(line.products_id)
        .bind(line.quantity)
        .bind(line.date_added)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_id(&self, id: ShoppingCartId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.shopping_cart WHERE shopping_cart_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Empty a customer's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.shopping_cart WHERE customer_id = $1")
            .bind(customer_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Remove a product from every cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_products_id(
        &self,
        product_id: ProductId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.shopping_cart WHERE products_id = $1")
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.shopping_cart")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
