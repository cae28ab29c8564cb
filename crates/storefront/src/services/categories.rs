//! Category service.

use sqlx::PgPool;
use tracing::instrument;

use ecshop_core::CategoryId;

use crate::db::{CategoryRepository, RepositoryError};
use crate::models::{Category, CategoryInput};

/// Category operations.
pub struct CategoryService<'a> {
    categories: CategoryRepository<'a>,
}

impl<'a> CategoryService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            categories: CategoryRepository::new(pool),
        }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        self.categories.find_all().await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        self.categories.find_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        self.categories.find_by_name(name).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_is_active(&self, is_active: bool) -> Result<Vec<Category>, RepositoryError> {
        self.categories.find_by_is_active(is_active).await
    }

    /// Create a category, or replace one when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist, or
    /// `RepositoryError::Conflict` if the name is taken.
    #[instrument(skip(self, input))]
    pub async fn save(
        &self,
        id: Option<CategoryId>,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let category = self.categories.save(id, input).await?;
        tracing::info!(category_id = %category.categories_id, "Category saved");
        Ok(category)
    }

    /// Delete a category. Returns `false` if there was no such category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if products still reference it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        self.categories.delete_by_id(id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any category is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.categories.delete_all().await
    }
}
