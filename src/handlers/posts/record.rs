use axum::{extract::Path, http::StatusCode, response::Json};
use serde_json::{json, Value};
use uuid::Uuid;

use super::utils::{validate_new_post, validate_post_patch};
use crate::database::models::{PostWithAuthor, STATUS_PUBLISHED};
use crate::error::ApiError;
use crate::middleware::{AdminUser, AuthUser};
use crate::services::content_service::ContentService;
use crate::services::notification_service::NotificationService;

/// GET /posts/:post_id - Single article with author info flattened in
pub async fn get(Path(post_id): Path<i32>) -> Result<Json<PostWithAuthor>, ApiError> {
    let service = ContentService::new().await?;
    let post = service.get_post(post_id).await?;
    Ok(Json(post))
}

/// POST /posts - Create an article. When an admin publishes straight away,
/// the new-post fan-out runs as a best-effort side effect.
pub async fn create(
    user: AuthUser,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let fields = validate_new_post(&payload)?;

    let service = ContentService::new().await?;
    let post = service.create_post(user.id, fields).await?;

    if post.status_id == STATUS_PUBLISHED && user.is_admin() {
        fan_out_new_post(post.id, user.id).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Post created successfully",
            "data": post,
        })),
    ))
}

/// PUT /posts/:post_id - Partial update. An admin moving a post from
/// draft to published triggers the new-post fan-out.
pub async fn update(
    user: AuthUser,
    Path(post_id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let patch = validate_post_patch(&payload)?;
    let became_published = patch.status_id == Some(STATUS_PUBLISHED);

    let service = ContentService::new().await?;
    let outcome = service.update_post(post_id, patch).await?;

    if became_published && outcome.previous_status != STATUS_PUBLISHED && user.is_admin() {
        fan_out_new_post(post_id, outcome.author_id).await;
    }

    Ok(Json(json!({ "message": "Updated post successfully" })))
}

/// DELETE /posts/:post_id - Admin only; deleting an absent post is a no-op
pub async fn remove(
    AdminUser(_admin): AdminUser,
    Path(post_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = ContentService::new().await?;
    service.delete_post(post_id).await?;
    Ok(Json(json!({ "message": "Deleted post successfully" })))
}

/// Best-effort: a fan-out failure must never fail the publish itself
async fn fan_out_new_post(post_id: i32, author_id: Uuid) {
    match NotificationService::new().await {
        Ok(notifications) => match notifications.notify_new_post(post_id, author_id).await {
            Ok(written) => {
                tracing::debug!("new-post fan-out wrote {} notifications", written);
            }
            Err(e) => {
                tracing::warn!("Failed to send new post notifications: {}", e);
            }
        },
        Err(e) => {
            tracing::warn!("Failed to send new post notifications: {}", e);
        }
    }
}
