//! Product catalog service.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use ecshop_core::{CategoryId, ProductId};

use crate::db::products::ImageUpdate;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::{NewProduct, Product, ProductUpdate};

/// Product catalog operations.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.products.find_all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.products.find_by_id(id).await
    }

    /// First product with exactly this name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        self.products.find_by_name(name).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_category_id(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        self.products.find_by_category_id(category_id).await
    }

    /// Products priced within `[min, max]`, both ends inclusive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidInput` if `min > max` or either bound
    /// is negative.
    pub async fn find_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<Product>, RepositoryError> {
        if min.is_sign_negative() || max.is_sign_negative() {
            return Err(RepositoryError::InvalidInput(
                "price bounds must not be negative".to_string(),
            ));
        }
        if min > max {
            return Err(RepositoryError::InvalidInput(
                "minPrice must not exceed maxPrice".to_string(),
            ));
        }
        self.products.find_by_price_range(min, max).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_featured(&self) -> Result<Vec<Product>, RepositoryError> {
        self.products.find_featured().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU is taken or the
    /// category does not exist.
    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let product = self.products.insert(input).await?;
        tracing::info!(product_id = %product.products_id, "Product created");
        Ok(product)
    }

    /// Replace a product's fields. The SKU never changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductUpdate,
        image: ImageUpdate,
    ) -> Result<Product, RepositoryError> {
        self.products.update(id, input, image).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn update_stock(
        &self,
        id: ProductId,
        quantity_in_stock: i32,
    ) -> Result<Product, RepositoryError> {
        if quantity_in_stock < 0 {
            return Err(RepositoryError::InvalidInput(
                "quantityInStock must not be negative".to_string(),
            ));
        }
        self.products.update_stock(id, quantity_in_stock).await
    }

    /// Delete a product. Returns `false` if there was no such product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if order lines or carts still
    /// reference it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        self.products.delete_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any product is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.products.delete_all().await
    }
}
