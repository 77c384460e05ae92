use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::CommentView;
use crate::services::notification_service::{
    is_self_action, NotificationService, SideEffect,
};

#[derive(Debug, thiserror::Error)]
pub enum EngagementError {
    #[error("Post not found")]
    PostNotFound,
    #[error("Content is required")]
    EmptyComment,
    #[error("Not authorized to delete this comment")]
    NotCommentOwner,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Liked,
    Unliked,
}

impl LikeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LikeAction::Liked => "liked",
            LikeAction::Unliked => "unliked",
        }
    }
}

/// Result of one like toggle. `notify` reports the best-effort side effect
/// and never influences the HTTP response.
#[derive(Debug, Clone, Copy)]
pub struct ToggleResult {
    pub action: LikeAction,
    pub like_count: i32,
    pub notify: SideEffect,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub like_count: i32,
    pub is_liked: bool,
}

#[derive(Debug, Clone)]
pub struct CommentResult {
    pub comment: CommentView,
    pub notify: SideEffect,
}

pub struct EngagementService {
    pool: PgPool,
    notifications: NotificationService,
}

impl EngagementService {
    pub async fn new() -> Result<Self, EngagementError> {
        let pool = DatabaseManager::pool().await?;
        let notifications = NotificationService::with_pool(pool.clone());
        Ok(Self {
            pool,
            notifications,
        })
    }

    /// Toggle the caller's like on a post. The like row and the
    /// denormalized counter move together inside one transaction, so the
    /// counter cannot drift from the true row count; the unique
    /// (user_id, post_id) constraint collapses concurrent double-likes.
    pub async fn toggle_like(
        &self,
        user_id: Uuid,
        post_id: i32,
    ) -> Result<ToggleResult, EngagementError> {
        let mut tx = self.pool.begin().await?;

        let author_id: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;
        let author_id = author_id.ok_or(EngagementError::PostNotFound)?;

        let existing: Option<i32> =
            sqlx::query_scalar("SELECT id FROM likes WHERE user_id = $1 AND post_id = $2")
                .bind(user_id)
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
                .bind(user_id)
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            let like_count: i32 = sqlx::query_scalar(
                "UPDATE posts SET likes_count = GREATEST(0, likes_count - 1) WHERE id = $1 RETURNING likes_count",
            )
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;
            tx.commit().await?;

            return Ok(ToggleResult {
                action: LikeAction::Unliked,
                like_count,
                notify: SideEffect::Skipped,
            });
        }

        let inserted = sqlx::query(
            "INSERT INTO likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT (user_id, post_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let like_count: i32 = if inserted > 0 {
            sqlx::query_scalar(
                "UPDATE posts SET likes_count = likes_count + 1 WHERE id = $1 RETURNING likes_count",
            )
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            // Raced with an identical toggle that won the insert; report
            // the current count without moving it.
            sqlx::query_scalar("SELECT likes_count FROM posts WHERE id = $1")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?
        };
        tx.commit().await?;

        let notify = if is_self_action(user_id, author_id) {
            SideEffect::Skipped
        } else {
            match self
                .notifications
                .notify_like(post_id, user_id, author_id)
                .await
            {
                Ok(n) => SideEffect::Delivered(n),
                Err(e) => {
                    tracing::warn!("Error creating like notification: {}", e);
                    SideEffect::Failed
                }
            }
        };

        Ok(ToggleResult {
            action: LikeAction::Liked,
            like_count,
            notify,
        })
    }

    /// Combine the cached counter with an existence check on the caller's
    /// own like row.
    pub async fn like_status(
        &self,
        user_id: Uuid,
        post_id: i32,
    ) -> Result<LikeStatus, EngagementError> {
        let like_count: Option<i32> =
            sqlx::query_scalar("SELECT likes_count FROM posts WHERE id = $1")
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?;
        let like_count = like_count.ok_or(EngagementError::PostNotFound)?;

        let is_liked: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2")
                .bind(user_id)
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(LikeStatus {
            like_count,
            is_liked: is_liked.is_some(),
        })
    }

    /// Comments newest-first, author name/avatar joined at read time
    pub async fn list_comments(&self, post_id: i32) -> Result<Vec<CommentView>, EngagementError> {
        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.comment_text AS content, c.created_at,
                   u.name AS author_name, u.profile_pic AS author_avatar
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// Insert a comment and hand back the display shape the client needs
    /// immediately (commenter name/avatar included).
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        post_id: i32,
        text: &str,
    ) -> Result<CommentResult, EngagementError> {
        if comment_is_blank(text) {
            return Err(EngagementError::EmptyComment);
        }
        let text = text.trim();

        let author_id: Option<Uuid> = sqlx::query_scalar("SELECT user_id FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;
        let author_id = author_id.ok_or(EngagementError::PostNotFound)?;

        let (author_name, author_avatar): (String, Option<String>) =
            sqlx::query_as("SELECT name, profile_pic FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let (id, created_at): (i32, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
            "INSERT INTO comments (user_id, post_id, comment_text) VALUES ($1, $2, $3) RETURNING id, created_at",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        let notify = if is_self_action(user_id, author_id) {
            SideEffect::Skipped
        } else {
            match self
                .notifications
                .notify_comment(post_id, user_id, author_id)
                .await
            {
                Ok(n) => SideEffect::Delivered(n),
                Err(e) => {
                    tracing::warn!("Error creating comment notification: {}", e);
                    SideEffect::Failed
                }
            }
        };

        Ok(CommentResult {
            comment: CommentView {
                id,
                content: text.to_string(),
                created_at,
                author_name,
                author_avatar,
            },
            notify,
        })
    }

    /// Delete the caller's own comment. A non-owner gets Forbidden and the
    /// comment stays; an already-gone comment is a no-op success.
    pub async fn delete_comment(
        &self,
        user_id: Uuid,
        post_id: i32,
        comment_id: i32,
    ) -> Result<u64, EngagementError> {
        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM comments WHERE id = $1 AND post_id = $2")
                .bind(comment_id)
                .bind(post_id)
                .fetch_optional(&self.pool)
                .await?;

        let owner = match owner {
            Some(owner) => owner,
            None => return Ok(0),
        };
        if owner != user_id {
            return Err(EngagementError::NotCommentOwner);
        }

        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn comment_is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comments_are_rejected() {
        assert!(comment_is_blank(""));
        assert!(comment_is_blank("   \n\t"));
        assert!(!comment_is_blank("  great roast  "));
    }

    #[test]
    fn like_action_wire_names() {
        assert_eq!(LikeAction::Liked.as_str(), "liked");
        assert_eq!(LikeAction::Unliked.as_str(), "unliked");
    }
}
