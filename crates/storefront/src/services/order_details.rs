//! Order line item service.

use sqlx::PgPool;
use tracing::instrument;

use ecshop_core::{OrderDetailId, OrderId, ProductId};

use crate::db::{OrderDetailRepository, RepositoryError};
use crate::models::{OrderDetail, OrderDetailInput, OrderDetailSummary};

/// Order line item operations.
pub struct OrderDetailService<'a> {
    details: OrderDetailRepository<'a>,
}

impl<'a> OrderDetailService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            details: OrderDetailRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<OrderDetail>, RepositoryError> {
        self.details.find_all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: OrderDetailId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        self.details.find_by_id(id).await
    }

    /// An order's lines with product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderDetailSummary>, RepositoryError> {
        self.details.find_by_order_id(order_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_products_id(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        self.details.find_by_products_id(product_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist, or
    /// `RepositoryError::Conflict` if the order or product does not exist.
    #[instrument(skip(self, input), fields(order_id = %input.orders_id))]
    pub async fn save(
        &self,
        id: Option<OrderDetailId>,
        input: &OrderDetailInput,
    ) -> Result<OrderDetail, RepositoryError> {
        if input.discount > input.unit_price {
            return Err(RepositoryError::InvalidInput(
                "discount must not exceed unitPrice".to_string(),
            ));
        }
        self.details.save(id, input).await
    }

    /// Delete a line item. Returns `false` if there was no such line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderDetailId) -> Result<bool, RepositoryError> {
        self.details.delete_by_id(id).await
    }

    /// Delete an order's line items, returning the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete_by_order_id(&self, order_id: OrderId) -> Result<u64, RepositoryError> {
        self.details.delete_by_order_id(order_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.details.delete_all().await
    }
}
