use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// App-level profile row. The id is issued by the external identity
/// provider at registration; email lives with the provider only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
    pub created_at: DateTime<Utc>,
}
