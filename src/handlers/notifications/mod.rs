use axum::{extract::Path, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::notification_service::NotificationService;

/// GET /notifications - The caller's notifications, newest first
pub async fn list(user: AuthUser) -> Result<Json<Value>, ApiError> {
    let service = NotificationService::new().await?;
    let notifications = service.list_for_user(user.id).await?;
    Ok(Json(json!({ "notifications": notifications })))
}

/// PUT /notifications/:notification_id/read - Scoped to the caller's own
/// rows; marking someone else's notification comes back as not found.
pub async fn mark_read(
    user: AuthUser,
    Path(notification_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = NotificationService::new().await?;
    let notification = service.mark_read(notification_id, user.id).await?;
    Ok(Json(json!({
        "message": "Notification marked as read.",
        "notification": notification,
    })))
}

/// PUT /notifications/read-all - Idempotent bulk flip of unread rows
pub async fn mark_all_read(user: AuthUser) -> Result<Json<Value>, ApiError> {
    let service = NotificationService::new().await?;
    service.mark_all_read(user.id).await?;
    Ok(Json(json!({ "message": "All notifications marked as read." })))
}
