use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::notification::NotificationJoinRow;
use crate::database::models::{Notification, NotificationKind, NotificationView};

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

/// Outcome of a best-effort side effect, kept separate from the primary
/// operation's result so callers and tests can tell "liked" apart from
/// "liked and the author was notified". Never serialized to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Notification rows written
    Delivered(u64),
    /// Nothing to do (actor acting on their own post)
    Skipped,
    /// The write failed; the failure was logged and swallowed
    Failed,
}

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub async fn new() -> Result<Self, NotificationError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self::with_pool(pool))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fan out a new-post notification to every `user`-role account.
    /// Recipients are inserted in chunks so a large user base never turns
    /// into one unbounded statement. The admin author is not a recipient
    /// because the enumeration is scoped to the `user` role.
    pub async fn notify_new_post(
        &self,
        post_id: i32,
        author_id: Uuid,
    ) -> Result<u64, NotificationError> {
        let recipients: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE role = $1")
                .bind(crate::database::models::user::ROLE_USER)
                .fetch_all(&self.pool)
                .await?;

        let chunk_size = config::config().notifications.fanout_chunk_size.max(1);
        let mut written = 0u64;
        for chunk in recipients.chunks(chunk_size) {
            let result = sqlx::query(
                r#"
                INSERT INTO notifications (user_to_notify_id, actor_id, type, post_id)
                SELECT recipient, $2, $3, $4
                FROM UNNEST($1::uuid[]) AS recipient
                "#,
            )
            .bind(chunk.to_vec())
            .bind(author_id)
            .bind(NotificationKind::NewPost.as_str())
            .bind(post_id)
            .execute(&self.pool)
            .await?;
            written += result.rows_affected();
        }
        Ok(written)
    }

    /// Notify a post author that someone liked their post. Returns 0 when
    /// suppressed because the actor is the author.
    pub async fn notify_like(
        &self,
        post_id: i32,
        actor_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<u64, NotificationError> {
        self.notify_single(NotificationKind::LikePost, post_id, actor_id, recipient_id)
            .await
    }

    /// Notify a post author that someone commented on their post. Returns 0
    /// when suppressed because the actor is the author.
    pub async fn notify_comment(
        &self,
        post_id: i32,
        actor_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<u64, NotificationError> {
        self.notify_single(NotificationKind::CommentPost, post_id, actor_id, recipient_id)
            .await
    }

    async fn notify_single(
        &self,
        kind: NotificationKind,
        post_id: i32,
        actor_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<u64, NotificationError> {
        if is_self_action(actor_id, recipient_id) {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO notifications (user_to_notify_id, actor_id, type, post_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(recipient_id)
        .bind(actor_id)
        .bind(kind.as_str())
        .bind(post_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// All notifications targeted at one user, newest first, with actor
    /// name/avatar and post title joined in.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<NotificationView>, NotificationError> {
        let rows = sqlx::query_as::<_, NotificationJoinRow>(
            r#"
            SELECT n.id, n.created_at, n.type AS kind, n.is_read,
                   u.name AS actor_name, u.profile_pic AS actor_avatar,
                   p.id AS post_id, p.title AS post_title
            FROM notifications n
            JOIN users u ON u.id = n.actor_id
            JOIN posts p ON p.id = n.post_id
            WHERE n.user_to_notify_id = $1
            ORDER BY n.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(NotificationView::from).collect())
    }

    /// Flip one notification to read, scoped so a user can only touch
    /// their own rows. Returns the updated row.
    pub async fn mark_read(&self, id: i32, user_id: Uuid) -> Result<Notification, NotificationError> {
        sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications SET is_read = true
            WHERE id = $1 AND user_to_notify_id = $2
            RETURNING id, user_to_notify_id, actor_id, type, post_id, is_read, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(NotificationError::NotFound)
    }

    /// Bulk-flip every unread notification for the user; idempotent.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, NotificationError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE user_to_notify_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Retention: delete read notifications older than the cutoff.
    /// Driven by the prune-notifications CLI command, not a scheduler.
    pub async fn prune_read_older_than(&self, days: i64) -> Result<u64, NotificationError> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
        let result =
            sqlx::query("DELETE FROM notifications WHERE is_read = true AND created_at < $1")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

/// A user is never notified about their own action on their own post
pub fn is_self_action(actor_id: Uuid, recipient_id: Uuid) -> bool {
    actor_id == recipient_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_actions_are_suppressed() {
        let author = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(is_self_action(author, author));
        assert!(!is_self_action(other, author));
    }
}
