use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::ROLE_USER;
use crate::database::models::Profile;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("This username is already taken")]
    UsernameTaken,
    #[error("User profile not found")]
    ProfileNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

/// Partial profile update; only supplied fields are written
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
}

pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub async fn new() -> Result<Self, ProfileError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Check username availability, optionally excluding one user id
    /// (the caller itself, when renaming).
    pub async fn username_taken(
        &self,
        username: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, ProfileError> {
        let taken: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id != $2)",
        )
        .bind(username)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(taken.is_some())
    }

    /// Insert the app-level profile row for a freshly registered account.
    /// The id comes from the identity provider; role defaults to `user`.
    pub async fn create(
        &self,
        id: Uuid,
        username: &str,
        name: &str,
    ) -> Result<Profile, ProfileError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO users (id, username, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, name, role, bio, profile_pic, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(name)
        .bind(ROLE_USER)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Profile, ProfileError> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, username, name, role, bio, profile_pic, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProfileError::ProfileNotFound)
    }

    /// Apply a partial update. Rejects with UsernameTaken before writing
    /// when the new username belongs to someone else.
    pub async fn update(&self, id: Uuid, patch: ProfilePatch) -> Result<Profile, ProfileError> {
        if let Some(username) = &patch.username {
            if self.username_taken(username, Some(id)).await? {
                return Err(ProfileError::UsernameTaken);
            }
        }

        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE users SET
                name        = COALESCE($2, name),
                username    = COALESCE($3, username),
                bio         = COALESCE($4, bio),
                profile_pic = COALESCE($5, profile_pic)
            WHERE id = $1
            RETURNING id, username, name, role, bio, profile_pic, created_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.username)
        .bind(patch.bio)
        .bind(patch.profile_pic)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ProfileError::ProfileNotFound)
    }
}
