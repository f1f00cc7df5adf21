//! Comment repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentSort};
use crate::utils::errors::ExploreError;

const COMMENT_COLUMNS: &str = "id, text, author_id, event_id, created_on, updated_on, edited, is_deleted";

#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub async fn create(
        &self,
        author_id: i64,
        event_id: i64,
        text: &str,
    ) -> Result<Comment, ExploreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            INSERT INTO comments (text, author_id, event_id, created_on, edited, is_deleted)
            VALUES ($1, $2, $3, $4, FALSE, FALSE)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(text)
        .bind(author_id)
        .bind(event_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Find comment by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, ExploreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Replace the comment text, marking it edited
    pub async fn update_text(&self, id: i64, text: &str) -> Result<Comment, ExploreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            r#"
            UPDATE comments
            SET text = $2, edited = TRUE, updated_on = $3
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Set or clear the soft-delete flag
    pub async fn set_deleted(&self, id: i64, deleted: bool) -> Result<Comment, ExploreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!(
            "UPDATE comments SET is_deleted = $2 WHERE id = $1 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(deleted)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Non-deleted comments for an event with pagination
    pub async fn find_visible_by_event(
        &self,
        event_id: i64,
        sort: CommentSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, ExploreError> {
        let order = match sort {
            CommentSort::CreatedOnAsc => "ASC",
            CommentSort::CreatedOnDesc => "DESC",
        };

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE event_id = $1 AND is_deleted = FALSE \
             ORDER BY created_on {order} LIMIT $2 OFFSET $3"
        ))
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
