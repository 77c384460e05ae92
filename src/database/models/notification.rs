use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Notification categories written by the fan-out paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewPost,
    LikePost,
    CommentPost,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewPost => "new_post",
            NotificationKind::LikePost => "like_post",
            NotificationKind::CommentPost => "comment_post",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_post" => Ok(NotificationKind::NewPost),
            "like_post" => Ok(NotificationKind::LikePost),
            "comment_post" => Ok(NotificationKind::CommentPost),
            other => Err(format!("unknown notification type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i32,
    pub user_to_notify_id: Uuid,
    pub actor_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub post_id: i32,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Flat join row fetched for the notification list
#[derive(Debug, Clone, FromRow)]
pub struct NotificationJoinRow {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub kind: String,
    pub is_read: bool,
    pub actor_name: String,
    pub actor_avatar: Option<String>,
    pub post_id: i32,
    pub post_title: String,
}

/// Notification as rendered for the dropdown: actor and post are nested
/// objects, matching what the client template expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_read: bool,
    pub actor: NotificationActor,
    pub post: NotificationPost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationActor {
    pub name: String,
    pub profile_pic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPost {
    pub id: i32,
    pub title: String,
}

impl From<NotificationJoinRow> for NotificationView {
    fn from(row: NotificationJoinRow) -> Self {
        NotificationView {
            id: row.id,
            created_at: row.created_at,
            kind: row.kind,
            is_read: row.is_read,
            actor: NotificationActor {
                name: row.actor_name,
                profile_pic: row.actor_avatar,
            },
            post: NotificationPost {
                id: row.post_id,
                title: row.post_title,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            NotificationKind::NewPost,
            NotificationKind::LikePost,
            NotificationKind::CommentPost,
        ] {
            assert_eq!(NotificationKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(NotificationKind::from_str("follow").is_err());
    }

    #[test]
    fn view_nests_actor_and_post() {
        let row = NotificationJoinRow {
            id: 7,
            created_at: chrono::Utc::now(),
            kind: "like_post".into(),
            is_read: false,
            actor_name: "Som".into(),
            actor_avatar: None,
            post_id: 42,
            post_title: "Brewing Basics".into(),
        };
        let view = NotificationView::from(row);
        assert_eq!(view.actor.name, "Som");
        assert_eq!(view.post.id, 42);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "like_post");
        assert_eq!(json["post"]["title"], "Brewing Basics");
    }
}
