use axum::response::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::profile_service::ProfileService;

/// GET /auth/get-user - Current identity: provider account joined with the
/// app profile row.
pub async fn get_user(user: AuthUser) -> Result<Json<Value>, ApiError> {
    let profiles = ProfileService::new().await?;
    let profile = profiles.fetch(user.id).await?;

    Ok(Json(json!({
        "id": user.id,
        "email": user.email,
        "username": profile.username,
        "name": profile.name,
        "role": profile.role,
        "profilePic": profile.profile_pic,
        "bio": profile.bio,
    })))
}
