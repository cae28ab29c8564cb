//! Product repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ecshop_core::{CategoryId, ProductId};

use super::{RepositoryError, map_write_error};
use crate::models::{NewProduct, Product, ProductUpdate};

const PRODUCT_COLUMNS: &str = "products_id, categories_id, product_name, sku, price, \
     discount_rate, quantity_in_stock, last_restocked, threshold_level, warehouse_location, \
     description, is_featured, created_date, updated_date, image, rating, reviews_count";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    products_id: i32,
    categories_id: i32,
    product_name: String,
    sku: String,
    price: Decimal,
    discount_rate: f32,
    quantity_in_stock: i32,
    last_restocked: Option<DateTime<Utc>>,
    threshold_level: i32,
    warehouse_location: Option<String>,
    description: Option<String>,
    is_featured: bool,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
    image: Option<Vec<u8>>,
    rating: f32,
    reviews_count: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            products_id: ProductId::new(row.products_id),
            categories_id: CategoryId::new(row.categories_id),
            product_name: row.product_name,
            sku: row.sku,
            price: row.price,
            discount_rate: row.discount_rate,
            quantity_in_stock: row.quantity_in_stock,
            last_restocked: row.last_restocked,
            threshold_level: row.threshold_level,
            warehouse_location: row.warehouse_location,
            description: row.description,
            is_featured: row.is_featured,
            created_date: row.created_date,
            updated_date: row.updated_date,
            image: row.image,
            rating: row.rating,
            reviews_count: row.reviews_count,
        }
    }
}

/// How an update treats the stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUpdate {
    /// Leave the stored image untouched.
    Keep,
    /// Replace the stored image when the update carries a non-empty one.
    ReplaceIfPresent,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products ORDER BY products_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE products_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Get the first product (lowest ID) with an exact name match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products \
             WHERE product_name = $1 ORDER BY products_id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// List products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE categories_id = $1 ORDER BY products_id"
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List products priced within `[min, max]`, inclusive at both ends.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE price BETWEEN $1 AND $2 ORDER BY products_id"
        ))
        .bind(min)
        .bind(max)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List featured products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products WHERE is_featured ORDER BY products_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU is taken or the
    /// category does not exist.
    pub async fn insert(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO shop.products (
                categories_id, product_name, sku, price, discount_rate, quantity_in_stock,
                last_restocked, threshold_level, warehouse_location, description,
                is_featured, image, rating, reviews_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(input.categories_id)
        .bind(&input.product_name)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.discount_rate)
        .bind(input.quantity_in_stock)
        .bind(input.last_restocked)
        .bind(input.threshold_level)
        .bind(&input.warehouse_location)
        .bind(&input.description)
        .bind(input.is_featured)
        .bind(&input.image)
        .bind(input.rating)
        .bind(input.reviews_count)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    /// Replace a product's fields (SKU excluded) and stamp `updated_date`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the category does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductUpdate,
        image: ImageUpdate,
    ) -> Result<Product, RepositoryError> {
        let new_image = match image {
            ImageUpdate::Keep => None,
            ImageUpdate::ReplaceIfPresent => input.image.as_deref().filter(|b| !b.is_empty()),
        };

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE shop.products
            SET
                categories_id = $2,
                product_name = $3,
                price = $4,
                discount_rate = $5,
                quantity_in_stock = $6,
                last_restocked = $7,
                threshold_level = $8,
                warehouse_location = $9,
                description = $10,
                is_featured = $11,
                rating = $12,
                reviews_count = $13,
                image = COALESCE($14, image),
                updated_date = NOW()
            WHERE products_id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(input.categories_id)
        .bind(&input.product_name)
        .bind(input.price)
        .bind(input.discount_rate)
        .bind(input.quantity_in_stock)
        .bind(input.last_restocked)
        .bind(input.threshold_level)
        .bind(&input.warehouse_location)
        .bind(&input.description)
        .bind(input.is_featured)
        .bind(input.rating)
        .bind(input.reviews_count)
        .bind(new_image)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Set the stock level and stamp `updated_date`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update_stock(
        &self,
        id: ProductId,
        quantity_in_stock: i32,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE shop.products
            SET quantity_in_stock = $2, updated_date = NOW()
            WHERE products_id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(quantity_in_stock)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if order lines or carts still
    /// reference it.
    pub async fn delete_by_id(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.products WHERE products_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any product is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.products")
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected())
    }
}
