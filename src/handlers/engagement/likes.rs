use axum::{extract::Path, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::engagement_service::{EngagementService, LikeAction, LikeStatus};

/// POST /posts/:post_id/like - Toggle the caller's like.
/// The notification to the author is best-effort and never affects the
/// response; the toggle result alone decides status and body.
pub async fn toggle(
    user: AuthUser,
    Path(post_id): Path<i32>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let service = EngagementService::new().await?;
    let result = service.toggle_like(user.id, post_id).await?;

    let (status, message) = match result.action {
        LikeAction::Liked => (StatusCode::CREATED, "Like added successfully"),
        LikeAction::Unliked => (StatusCode::OK, "Like removed successfully"),
    };

    Ok((
        status,
        Json(json!({
            "message": message,
            "action": result.action.as_str(),
            "likeCount": result.like_count,
        })),
    ))
}

/// GET /posts/:post_id/like-status - Cached counter plus the caller's own
/// like-row existence.
pub async fn status(
    user: AuthUser,
    Path(post_id): Path<i32>,
) -> Result<Json<LikeStatus>, ApiError> {
    let service = EngagementService::new().await?;
    let status = service.like_status(user.id, post_id).await?;
    Ok(Json(status))
}
