use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Post status codes as stored in the statuses table
pub const STATUS_PUBLISHED: i32 = 1;
pub const STATUS_DRAFT: i32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub image: String,
    pub category_id: i32,
    pub user_id: Uuid,
    pub status_id: i32,
    pub date: DateTime<Utc>,
    pub likes_count: i32,
}

/// Row shape for the paginated article list; carries the category name
/// from the join instead of the raw foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostListItem {
    pub id: i32,
    pub image: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub status_id: i32,
    pub likes_count: i32,
    pub category: String,
}

/// Single-article view with the author profile flattened in, the shape
/// the article page consumes directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostWithAuthor {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub image: String,
    pub category_id: i32,
    pub status_id: i32,
    pub date: DateTime<Utc>,
    pub likes_count: i32,
    pub author_id: Uuid,
    pub author: String,
    pub author_bio: Option<String>,
    pub author_avatar: Option<String>,
}
