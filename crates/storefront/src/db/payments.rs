//! Payment record repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ecshop_core::{OrderId, PaymentId};

use super::{RepositoryError, map_write_error};
use crate::models::{Payment, PaymentInput};

const PAYMENT_COLUMNS: &str = "payments_id, orders_id, payment_method, transaction_date, \
     transaction_amount, transaction_status, gateway_response";

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    payments_id: i32,
    orders_id: i32,
    payment_method: Option<String>,
    transaction_date: DateTime<Utc>,
    transaction_amount: Decimal,
    transaction_status: String,
    gateway_response: Option<String>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            payments_id: PaymentId::new(row.payments_id),
            orders_id: OrderId::new(row.orders_id),
            payment_method: row.payment_method,
            transaction_date: row.transaction_date,
            transaction_amount: row.transaction_amount,
            transaction_status: row.transaction_status,
            gateway_response: row.gateway_response,
        }
    }
}

/// Repository for payment database operations.
pub struct PaymentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PaymentRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all payments.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Payment>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM shop.payments ORDER BY payments_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Payment::from).collect())
    }

    /// Get a payment by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM shop.payments WHERE payments_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Payment::from))
    }

    /// Get the payment for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Payment>, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM shop.payments WHERE orders_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Payment::from))
    }

    /// Insert a new payment, or replace an existing one when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist.
    /// Returns `RepositoryError::Conflict` if the order already has a payment
    /// or does not exist.
    pub async fn save(
        &self,
        id: Option<PaymentId>,
        input: &PaymentInput,
    ) -> Result<Payment, RepositoryError> {
        let row = match id {
            None => sqlx::query_as::<_, PaymentRow>(&format!(
                r"
                INSERT INTO shop.payments (
                    orders_id, payment_method, transaction_date, transaction_amount,
                    transaction_status, gateway_response
                )
                VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6)
                RETURNING {PAYMENT_COLUMNS}
                "
            ))
            .bind(input.orders_id)
            .bind(&input.payment_method)
            .bind(input.transaction_date)
            .bind(input.transaction_amount)
            .bind(&input.transaction_status)
            .bind(&input.gateway_response)
            .fetch_one(self.pool)
            .await
            .map_err(map_write_error)?,
            Some(id) => sqlx::query_as::<_, PaymentRow>(&format!(
                r"
                UPDATE shop.payments
                SET
                    orders_id = $2,
                    payment_method = $3,
                    transaction_date = COALESCE($4, NOW()),
                    transaction_amount = $5,
                    transaction_status = $6,
                    gateway_response = $7
                WHERE payments_id = $1
                RETURNING {PAYMENT_COLUMNS}
                "
            ))
            .bind(id)
            .bind(input.orders_id)
            .bind(&input.payment_method)
            .bind(input.transaction_date)
            .bind(input.transaction_amount)
            .bind(&input.transaction_status)
            .bind(&input.gateway_response)
            .fetch_optional(self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(RepositoryError::NotFound)?,
        };

        Ok(row.into())
    }

    /// Delete a payment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_id(&self, id: PaymentId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.payments WHERE payments_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the payment for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_order_id(&self, order_id: OrderId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.payments WHERE orders_id = $1")
            .bind(order_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every payment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.payments")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
