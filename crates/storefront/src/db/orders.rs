//! Order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ecshop_core::{CustomerId, OrderId};

use super::{RepositoryError, map_write_error};
use crate::models::{NewOrder, Order, OrderPatch};

const ORDER_COLUMNS: &str = "orders_id, customer_id, order_date, total_amount, payment_status, \
     shipping_status, shipping_address, billing_address, payment_method, tracking_number, \
     estimated_delivery_date, notes, is_cancelled, cancellation_date, updated_date";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    orders_id: i32,
    customer_id: i32,
    order_date: DateTime<Utc>,
    total_amount: Decimal,
    payment_status: String,
    shipping_status: String,
    shipping_address: Option<String>,
    billing_address: Option<String>,
    payment_method: Option<String>,
    tracking_number: Option<String>,
    estimated_delivery_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    is_cancelled: bool,
    cancellation_date: Option<DateTime<Utc>>,
    updated_date: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            orders_id: OrderId::new(row.orders_id),
            customer_id: CustomerId::new(row.customer_id),
            order_date: row.order_date,
            total_amount: row.total_amount,
            payment_status: row.payment_status,
            shipping_status: row.shipping_status,
            shipping_address: row.shipping_address,
            billing_address: row.billing_address,
            payment_method: row.payment_method,
            tracking_number: row.tracking_number,
            estimated_delivery_date: row.estimated_delivery_date,
            notes: row.notes,
            is_cancelled: row.is_cancelled,
            cancellation_date: row.cancellation_date,
            updated_date: row.updated_date,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders ORDER BY orders_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE orders_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// List a customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE customer_id = $1 ORDER BY orders_id"
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// List orders by cancellation flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_is_cancelled(
        &self,
        is_cancelled: bool,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE is_cancelled = $1 ORDER BY orders_id"
        ))
        .bind(is_cancelled)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Get the most recent order (highest ID).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_last(&self) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders ORDER BY orders_id DESC LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the customer does not exist.
    pub async fn insert(&self, input: &NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO shop.orders (
                customer_id, order_date, total_amount, payment_status, shipping_status,
                shipping_address, billing_address, payment_method, tracking_number,
                estimated_delivery_date, notes, is_cancelled, cancellation_date
            )
            VALUES ($1, COALESCE($2, NOW()), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(input.customer_id)
        .bind(input.order_date)
        .bind(input.total_amount)
        .bind(&input.payment_status)
        .bind(&input.shipping_status)
        .bind(&input.shipping_address)
        .bind(&input.billing_address)
        .bind(&input.payment_method)
        .bind(&input.tracking_number)
        .bind(input.estimated_delivery_date)
        .bind(&input.notes)
        .bind(input.is_cancelled)
        .bind(input.cancellation_date)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    /// Apply the non-null fields of `patch` and stamp `updated_date`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn update(&self, id: OrderId, patch: &OrderPatch) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE shop.orders
            SET
                customer_id = COALESCE($2, customer_id),
                order_date = COALESCE($3, order_date),
                total_amount = COALESCE($4, total_amount),
                payment_status = COALESCE($5, payment_status),
                shipping_status = COALESCE($6, shipping_status),
                shipping_address = COALESCE($7, shipping_address),
                billing_address = COALESCE($8, billing_address),
                payment_method = COALESCE($9, payment_method),
                tracking_number = COALESCE($10, tracking_number),
                estimated_delivery_date = COALESCE($11, estimated_delivery_date),
                notes = COALESCE($12, notes),
                is_cancelled = COALESCE($13, is_cancelled),
                cancellation_date = COALESCE($14, cancellation_date),
                updated_date = NOW()
            WHERE orders_id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.customer_id)
        .bind(patch.order_date)
        .bind(patch.total_amount)
        .bind(&patch.payment_status)
        .bind(&patch.shipping_status)
        .bind(&patch.shipping_address)
        .bind(&patch.billing_address)
        .bind(&patch.payment_method)
        .bind(&patch.tracking_number)
        .bind(patch.estimated_delivery_date)
        .bind(&patch.notes)
        .bind(patch.is_cancelled)
        .bind(patch.cancellation_date)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Set an order's payment status.
    ///
    /// # Returns
    ///
    /// `true` if the order exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_payment_status(
        &self,
        id: OrderId,
        payment_status: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.orders SET payment_status = $2, updated_date = NOW() WHERE orders_id = $1",
        )
        .bind(id)
        .bind(payment_status)
        .execute(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if line items or a payment still
    /// reference it.
    pub async fn delete_by_id(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.orders WHERE orders_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an order together with its line items and payment record.
    ///
    /// Runs in one transaction. Used when the payment gateway reports a
    /// failed payment.
    ///
    /// # Returns
    ///
    /// `true` if the order existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is deleted in that case.
    pub async fn delete_with_children(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM shop.order_details WHERE orders_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM shop.payments WHERE orders_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM shop.orders WHERE orders_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any order is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.orders")
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected())
    }
}
