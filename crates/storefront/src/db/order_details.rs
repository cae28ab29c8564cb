//! Order line item repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use ecshop_core::{OrderDetailId, OrderId, ProductId};

use super::{RepositoryError, map_write_error};
use crate::models::{OrderDetail, OrderDetailInput, OrderDetailSummary};

const DETAIL_COLUMNS: &str =
    "order_details_id, orders_id, products_id, quantity, unit_price, discount";

#[derive(Debug, sqlx::FromRow)]
struct OrderDetailRow {
    order_details_id: i32,
    orders_id: i32,
    products_id: i32,
    quantity: i32,
    unit_price: Decimal,
    discount: Decimal,
}

impl From<OrderDetailRow> for OrderDetail {
    fn from(row: OrderDetailRow) -> Self {
        Self {
            order_details_id: OrderDetailId::new(row.order_details_id),
            orders_id: OrderId::new(row.orders_id),
            products_id: ProductId::new(row.products_id),
            quantity: row.quantity,
            unit_price: row.unit_price,
            discount: row.discount,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    order_details_id: i32,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<SummaryRow> for OrderDetailSummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            order_detail_id: OrderDetailId::new(row.order_details_id),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Repository for order line item database operations.
pub struct OrderDetailRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderDetailRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<OrderDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderDetailRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM shop.order_details ORDER BY order_details_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderDetail::from).collect())
    }

    /// Get a line item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(
        &self,
        id: OrderDetailId,
    ) -> Result<Option<OrderDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderDetailRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM shop.order_details WHERE order_details_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(OrderDetail::from))
    }

    /// List an order's line items with product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_order_id(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderDetailSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT d.order_details_id, p.product_name, d.quantity, d.unit_price
            FROM shop.order_details d
            JOIN shop.products p ON p.products_id = d.products_id
            WHERE d.orders_id = $1
            ORDER BY d.order_details_id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderDetailSummary::from).collect())
    }

    /// List line items for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_products_id(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<OrderDetail>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderDetailRow>(&format!(
            "SELECT {DETAIL_COLUMNS} FROM shop.order_details \
             WHERE products_id = $1 ORDER BY order_details_id"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderDetail::from).collect())
    }

    /// Insert a new line item, or replace an existing one when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist.
    /// Returns `RepositoryError::Conflict` if the order or product does not exist.
    pub async fn save(
        &self,
        id: Option<OrderDetailId>,
        input: &OrderDetailInput,
    ) -> Result<OrderDetail, RepositoryError> {
        let row = match id {
            None => {
                sqlx::query_as::<_, OrderDetailRow>(&format!(
                    r"
                    INSERT INTO shop.order_details (orders_id, products_id, quantity, unit_price, discount)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING {DETAIL_COLUMNS}
                    "
                ))
                .bind(input.orders_id)
                .bind(input.products_id)
                .bind(input.quantity)
                .bind(input.unit_price)
                .bind(input.discount)
                .fetch_one(self.pool)
                .await
                .map_err(map_write_error)?
            }
            Some(id) => sqlx::query_as::<_, OrderDetailRow>(&format!(
                r"
                UPDATE shop.order_details
                SET orders_id = $2, products_id = $3, quantity = $4, unit_price = $5, discount = $6
                WHERE order_details_id = $1
                RETURNING {DETAIL_COLUMNS}
                "
            ))
            .bind(id)
            .bind(input.orders_id)
            .bind(input.products_id)
            .bind(input.quantity)
            .bind(input.unit_price)
            .bind(input.discount)
            .fetch_optional(self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or(RepositoryError::NotFound)?,
        };

        Ok(row.into())
    }

    /// Delete a line item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_id(&self, id: OrderDetailId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.order_details WHERE order_details_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_by_order_id(&self, order_id: OrderId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.order_details WHERE orders_id = $1")
            .bind(order_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every line item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.order_details")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
