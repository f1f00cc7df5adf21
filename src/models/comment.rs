//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::datetime::{serde_format, serde_format_opt};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub event_id: i64,
    pub created_on: DateTime<Utc>,
    pub updated_on: Option<DateTime<Utc>>,
    pub edited: bool,
    pub is_deleted: bool,
}

/// Wire representation of a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub text: String,
    pub author: i64,
    pub event: i64,
    #[serde(with = "serde_format")]
    pub created_on: DateTime<Utc>,
    #[serde(with = "serde_format_opt")]
    pub updated_on: Option<DateTime<Utc>>,
    pub edited: bool,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text.clone(),
            author: comment.author_id,
            event: comment.event_id,
            created_on: comment.created_on,
            updated_on: comment.updated_on,
            edited: comment.edited,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    pub event_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

/// Sort order for the public comment listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSort {
    CreatedOnAsc,
    #[default]
    CreatedOnDesc,
}

impl CommentSort {
    /// Parses the `sort` query parameter; `createdOn,ASC` selects ascending,
    /// anything else falls back to descending.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("createdOn,ASC") => CommentSort::CreatedOnAsc,
            _ => CommentSort::CreatedOnDesc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_sort_from_query() {
        assert_eq!(CommentSort::from_query(Some("createdOn,ASC")), CommentSort::CreatedOnAsc);
        assert_eq!(CommentSort::from_query(Some("createdOn,DESC")), CommentSort::CreatedOnDesc);
        assert_eq!(CommentSort::from_query(Some("garbage")), CommentSort::CreatedOnDesc);
        assert_eq!(CommentSort::from_query(None), CommentSort::CreatedOnDesc);
    }
}
