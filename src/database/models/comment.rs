use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Comment as returned to clients: author name/avatar are joined at read
/// time, never cached on the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentView {
    pub id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub author_avatar: Option<String>,
}
