use axum::{extract::Path, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::engagement_service::EngagementService;

/// GET /posts/:post_id/comments - Public, newest first
pub async fn list(Path(post_id): Path<i32>) -> Result<Json<Value>, ApiError> {
    let service = EngagementService::new().await?;
    let comments = service.list_comments(post_id).await?;
    Ok(Json(json!({ "comments": comments })))
}

/// POST /posts/:post_id/comments - Add a comment. The response carries the
/// commenter's display name/avatar so the client can render it without a
/// refetch; the author notification is best-effort.
pub async fn create(
    user: AuthUser,
    Path(post_id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let content = payload
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let service = EngagementService::new().await?;
    let result = service.add_comment(user.id, post_id, content).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment added successfully",
            "comment": result.comment,
        })),
    ))
}

/// DELETE /posts/:post_id/comments/:comment_id - Author only; an
/// already-gone comment is a no-op success.
pub async fn remove(
    user: AuthUser,
    Path((post_id, comment_id)): Path<(i32, i32)>,
) -> Result<Json<Value>, ApiError> {
    let service = EngagementService::new().await?;
    service.delete_comment(user.id, post_id, comment_id).await?;
    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}
