use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::profile_service::{ProfilePatch, ProfileService};

/// PUT /auth/update-profile - Partial update of name/username/bio/avatar.
/// A username change is checked for uniqueness excluding the caller.
pub async fn update_profile(
    user: AuthUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<Value>, ApiError> {
    let profiles = ProfileService::new().await?;
    let profile = profiles.update(user.id, patch).await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": {
            "id": profile.id,
            "email": user.email,
            "username": profile.username,
            "name": profile.name,
            "role": profile.role,
            "profilePic": profile.profile_pic,
            "bio": profile.bio,
        }
    })))
}
