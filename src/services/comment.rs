//! Comment moderation service
//!
//! Enforces authorship, the edit time window, and event-state preconditions
//! for comment creation, editing, and soft-deletion.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::database::repositories::{CommentRepository, EventRepository, UserRepository};
use crate::models::comment::{Comment, CommentDto, CommentSort};
use crate::models::event::EventState;
use crate::utils::errors::{ExploreError, Result};
use crate::utils::logging::log_admin_action;

/// Edits are allowed only within this window after creation
const EDIT_WINDOW_HOURS: i64 = 6;

#[derive(Debug, Clone)]
pub struct CommentService {
    comment_repository: CommentRepository,
    event_repository: EventRepository,
    user_repository: UserRepository,
}

impl CommentService {
    /// Create a new CommentService instance
    pub fn new(
        comment_repository: CommentRepository,
        event_repository: EventRepository,
        user_repository: UserRepository,
    ) -> Self {
        Self {
            comment_repository,
            event_repository,
            user_repository,
        }
    }

    /// Add a comment to a published event with comments enabled
    pub async fn add_comment(
        &self,
        user_id: i64,
        event_id: i64,
        text: &str,
    ) -> Result<CommentDto> {
        debug!(user_id = user_id, event_id = event_id, "Adding comment");

        validate_text(text)?;

        if !self.user_repository.exists_by_id(user_id).await? {
            return Err(ExploreError::not_found("User", user_id));
        }

        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        if event.state() != EventState::Published {
            return Err(ExploreError::BusinessRuleViolation(
                "Comments can only be added to published events".to_string(),
            ));
        }
        if !event.comments_enabled {
            return Err(ExploreError::BusinessRuleViolation(
                "Comments are disabled for this event".to_string(),
            ));
        }

        let comment = self.comment_repository.create(user_id, event_id, text).await?;
        info!(comment_id = comment.id, event_id = event_id, "Comment added");
        Ok(CommentDto::from(&comment))
    }

    /// Edit the author's own comment within the edit window
    pub async fn update_user_comment(
        &self,
        user_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<CommentDto> {
        debug!(user_id = user_id, comment_id = comment_id, "Updating comment");

        validate_text(text)?;

        let comment = self.find_authored(user_id, comment_id).await?;
        check_editable(&comment, Utc::now())?;

        let updated = self.comment_repository.update_text(comment_id, text).await?;
        info!(comment_id = comment_id, "Comment updated");
        Ok(CommentDto::from(&updated))
    }

    /// Soft-delete the author's own comment; a no-op when already deleted
    pub async fn delete_user_comment(&self, user_id: i64, comment_id: i64) -> Result<()> {
        let comment = self.find_authored(user_id, comment_id).await?;

        if deletion_flag_changes(&comment, true) {
            self.comment_repository.set_deleted(comment_id, true).await?;
            info!(comment_id = comment_id, user_id = user_id, "Comment deleted by author");
        }
        Ok(())
    }

    /// Soft-delete any comment; a no-op when already deleted
    pub async fn delete_comment_by_admin(&self, comment_id: i64) -> Result<()> {
        let comment = self
            .comment_repository
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Comment", comment_id))?;

        if deletion_flag_changes(&comment, true) {
            self.comment_repository.set_deleted(comment_id, true).await?;
            log_admin_action("delete_comment", "Comment", comment_id);
        }
        Ok(())
    }

    /// Restore a soft-deleted comment; a no-op when not deleted
    pub async fn restore_comment_by_admin(&self, comment_id: i64) -> Result<CommentDto> {
        let comment = self
            .comment_repository
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Comment", comment_id))?;

        if !deletion_flag_changes(&comment, false) {
            return Ok(CommentDto::from(&comment));
        }

        let restored = self.comment_repository.set_deleted(comment_id, false).await?;
        log_admin_action("restore_comment", "Comment", comment_id);
        Ok(CommentDto::from(&restored))
    }

    /// Non-deleted comments for an event; empty list when comments are
    /// disabled on the event.
    pub async fn get_comments_for_event(
        &self,
        event_id: i64,
        from: i64,
        size: i64,
        sort: CommentSort,
    ) -> Result<Vec<CommentDto>> {
        let event = self
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Event", event_id))?;

        if !event.comments_enabled {
            return Ok(Vec::new());
        }

        let comments = self
            .comment_repository
            .find_visible_by_event(event_id, sort, size, from)
            .await?;
        Ok(comments.iter().map(CommentDto::from).collect())
    }

    async fn find_authored(&self, user_id: i64, comment_id: i64) -> Result<Comment> {
        let comment = self
            .comment_repository
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ExploreError::not_found("Comment", comment_id))?;

        if comment.author_id != user_id {
            return Err(ExploreError::not_found("Comment", comment_id));
        }
        Ok(comment)
    }
}

fn validate_text(text: &str) -> Result<()> {
    let len = text.trim().chars().count();
    if len == 0 || len > 2000 {
        return Err(ExploreError::InvalidInput(
            "Comment text must be between 1 and 2000 characters".to_string(),
        ));
    }
    Ok(())
}

/// Soft-delete and restore are idempotent: the flag is only written when the
/// requested value differs from the stored one.
pub fn deletion_flag_changes(comment: &Comment, deleted: bool) -> bool {
    comment.is_deleted != deleted
}

/// A comment is editable while not deleted and within the edit window after
/// creation.
pub fn check_editable(comment: &Comment, now: DateTime<Utc>) -> Result<()> {
    if comment.is_deleted {
        return Err(ExploreError::BusinessRuleViolation(
            "Cannot edit a deleted comment".to_string(),
        ));
    }
    if comment.created_on < now - Duration::hours(EDIT_WINDOW_HOURS) {
        return Err(ExploreError::BusinessRuleViolation(format!(
            "Comments can only be edited within {EDIT_WINDOW_HOURS} hours of creation"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn sample_comment(created_on: DateTime<Utc>, is_deleted: bool) -> Comment {
        Comment {
            id: 1,
            text: "A comment".to_string(),
            author_id: 1,
            event_id: 1,
            created_on,
            updated_on: None,
            edited: false,
            is_deleted,
        }
    }

    #[test]
    fn test_edit_allowed_within_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let comment = sample_comment(now - Duration::hours(5), false);
        assert!(check_editable(&comment, now).is_ok());
    }

    #[test]
    fn test_edit_rejected_after_window() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let comment = sample_comment(now - Duration::hours(7), false);
        assert_matches!(
            check_editable(&comment, now),
            Err(ExploreError::BusinessRuleViolation(_))
        );
    }

    #[test]
    fn test_edit_rejected_when_deleted() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let comment = sample_comment(now - Duration::hours(1), true);
        assert_matches!(
            check_editable(&comment, now),
            Err(ExploreError::BusinessRuleViolation(_))
        );
    }

    #[test]
    fn test_delete_and_restore_are_idempotent() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let live = sample_comment(now, false);
        let deleted = sample_comment(now, true);

        // A second delete and a restore of a live comment are no-ops
        assert!(deletion_flag_changes(&live, true));
        assert!(!deletion_flag_changes(&deleted, true));
        assert!(deletion_flag_changes(&deleted, false));
        assert!(!deletion_flag_changes(&live, false));
    }

    #[test]
    fn test_validate_text_bounds() {
        assert!(validate_text("fine").is_ok());
        assert_matches!(validate_text("   "), Err(ExploreError::InvalidInput(_)));
        let long = "x".repeat(2001);
        assert_matches!(validate_text(&long), Err(ExploreError::InvalidInput(_)));
    }
}
