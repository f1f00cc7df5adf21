//! Category repository implementation

use sqlx::PgPool;

use crate::models::category::Category;
use crate::utils::errors::ExploreError;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category
    pub async fn create(&self, name: &str) -> Result<Category, ExploreError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find category by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>, ExploreError> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Case-insensitive name uniqueness check, excluding the given id
    pub async fn exists_by_name(&self, name: &str, exclude_id: Option<i64>) -> Result<bool, ExploreError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM categories WHERE LOWER(name) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Rename category
    pub async fn update(&self, id: i64, name: &str) -> Result<Category, ExploreError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Delete category
    pub async fn delete(&self, id: i64) -> Result<(), ExploreError> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List categories with pagination, ascending by id
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Category>, ExploreError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }
}
