//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ecshop_core::CategoryId;

use super::{RepositoryError, map_write_error};
use crate::models::{Category, CategoryInput};

const CATEGORY_COLUMNS: &str =
    "categories_id, categories_name, description, created_date, updated_date, is_active";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    categories_id: i32,
    categories_name: String,
    description: Option<String>,
    created_date: DateTime<Utc>,
    updated_date: DateTime<Utc>,
    is_active: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            categories_id: CategoryId::new(row.categories_id),
            categories_name: row.categories_name,
            description: row.description,
            created_date: row.created_date,
            updated_date: row.updated_date,
            is_active: row.is_active,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.categories ORDER BY categories_id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.categories WHERE categories_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Get a category by its exact name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.categories WHERE categories_name = $1"
        ))
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// List categories by active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_is_active(&self, is_active: bool) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.categories \
             WHERE is_active = $1 ORDER BY categories_id"
        ))
        .bind(is_active)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Insert a new category, or replace an existing one when `id` is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if `id` does not exist.
    /// Returns `RepositoryError::Conflict` if the name is taken.
    pub async fn save(
        &self,
        id: Option<CategoryId>,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        match id {
            None => self.insert(input).await,
            Some(id) => self.update(id, input).await,
        }
    }

    async fn insert(&self, input: &CategoryInput) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r"
            INSERT INTO shop.categories (categories_name, description, is_active)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(&input.categories_name)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r"
            UPDATE shop.categories
            SET categories_name = $2, description = $3, is_active = $4, updated_date = NOW()
            WHERE categories_id = $1
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&input.categories_name)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a category.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if products still reference it.
    pub async fn delete_by_id(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.categories WHERE categories_id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if any category is still referenced.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.categories")
            .execute(self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected())
    }
}
