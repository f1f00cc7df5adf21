//! Compilation repository implementation
//!
//! The event set is stored as association rows in `compilation_events`;
//! updates replace the whole set.

use sqlx::PgPool;

use crate::models::compilation::Compilation;
use crate::utils::errors::ExploreError;

#[derive(Debug, Clone)]
pub struct CompilationRepository {
    pool: PgPool,
}

impl CompilationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new compilation and its association rows
    pub async fn create(
        &self,
        title: &str,
        pinned: bool,
        event_ids: &[i64],
    ) -> Result<Compilation, ExploreError> {
        let mut tx = self.pool.begin().await?;

        let compilation = sqlx::query_as::<_, Compilation>(
            "INSERT INTO compilations (title, pinned) VALUES ($1, $2) RETURNING id, title, pinned",
        )
        .bind(title)
        .bind(pinned)
        .fetch_one(&mut *tx)
        .await?;

        for event_id in event_ids {
            sqlx::query(
                "INSERT INTO compilation_events (compilation_id, event_id) VALUES ($1, $2)",
            )
            .bind(compilation.id)
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(compilation)
    }

    /// Find compilation by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Compilation>, ExploreError> {
        let compilation = sqlx::query_as::<_, Compilation>(
            "SELECT id, title, pinned FROM compilations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(compilation)
    }

    /// Case/whitespace-insensitive title uniqueness check
    pub async fn exists_by_normalized_title(
        &self,
        normalized_title: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, ExploreError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM compilations
            WHERE LOWER(REGEXP_REPLACE(TRIM(title), '\s+', ' ', 'g')) = $1
              AND ($2::BIGINT IS NULL OR id <> $2)
            "#,
        )
        .bind(normalized_title)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Update title/pinned and optionally replace the event set
    pub async fn update(
        &self,
        id: i64,
        title: Option<&str>,
        pinned: Option<bool>,
        event_ids: Option<&[i64]>,
    ) -> Result<Compilation, ExploreError> {
        let mut tx = self.pool.begin().await?;

        let compilation = sqlx::query_as::<_, Compilation>(
            r#"
            UPDATE compilations
            SET title = COALESCE($2, title),
                pinned = COALESCE($3, pinned)
            WHERE id = $1
            RETURNING id, title, pinned
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(pinned)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(event_ids) = event_ids {
            sqlx::query("DELETE FROM compilation_events WHERE compilation_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for event_id in event_ids {
                sqlx::query(
                    "INSERT INTO compilation_events (compilation_id, event_id) VALUES ($1, $2)",
                )
                .bind(id)
                .bind(event_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(compilation)
    }

    /// Delete compilation and its association rows
    pub async fn delete(&self, id: i64) -> Result<(), ExploreError> {
        sqlx::query("DELETE FROM compilations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List compilations, optionally restricted to pinned/unpinned
    pub async fn list(
        &self,
        pinned: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Compilation>, ExploreError> {
        let compilations = sqlx::query_as::<_, Compilation>(
            "SELECT id, title, pinned FROM compilations \
             WHERE ($1::BOOLEAN IS NULL OR pinned = $1) \
             ORDER BY id ASC LIMIT $2 OFFSET $3",
        )
        .bind(pinned)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(compilations)
    }

    /// Event ids associated with a compilation, ascending
    pub async fn event_ids(&self, compilation_id: i64) -> Result<Vec<i64>, ExploreError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT event_id FROM compilation_events WHERE compilation_id = $1 ORDER BY event_id ASC",
        )
        .bind(compilation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
