//! Order service.

use sqlx::PgPool;
use tracing::instrument;

use ecshop_core::{CustomerId, OrderId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{NewOrder, Order, OrderPatch};

/// Order operations.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        self.orders.find_all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        self.orders.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        self.orders.find_by_customer_id(customer_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_is_cancelled(
        &self,
        is_cancelled: bool,
    ) -> Result<Vec<Order>, RepositoryError> {
        self.orders.find_by_is_cancelled(is_cancelled).await
    }

    /// The order with the highest ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn last(&self) -> Result<Option<Order>, RepositoryError> {
        self.orders.find_last().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer does not exist.
    #[instrument(skip(self, input), fields(customer_id = %input.customer_id))]
    pub async fn create(&self, input: &NewOrder) -> Result<Order, RepositoryError> {
        let order = self.orders.insert(input).await?;
        tracing::info!(order_id = %order.orders_id, total = %order.total_amount, "Order created");
        Ok(order)
    }

    /// Apply the fields present in `patch`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: OrderId, patch: &OrderPatch) -> Result<Order, RepositoryError> {
        self.orders.update(id, patch).await
    }

    /// Delete an order. Returns `false` if there was no such order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if line items or a payment still
    /// reference it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let deleted = self.orders.delete_by_id(id).await?;
        if deleted {
            tracing::info!(order_id = %id, "Order deleted");
        }
        Ok(deleted)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any order is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.orders.delete_all().await
    }
}
