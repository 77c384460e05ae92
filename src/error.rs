// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(String),
    // Duplicate username/email. Historically surfaced as 400 rather than 409,
    // and clients key off that; see status_code().
    Conflict(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError(_) => 400,
            ApiError::Conflict(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        ApiError::ValidationError(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        match err {
            crate::database::manager::DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            crate::database::manager::DatabaseError::ConfigMissing(_) => {
                tracing::error!("Database configuration error: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            crate::database::manager::DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
            crate::database::manager::DatabaseError::MigrationError(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        crate::database::manager::DatabaseError::from(err).into()
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        match err {
            crate::auth::AuthError::InvalidCredentials => {
                ApiError::bad_request("Your password is incorrect or this email doesn't exist")
            }
            crate::auth::AuthError::DuplicateEmail => {
                ApiError::conflict("User with this email already exists")
            }
            crate::auth::AuthError::Unauthorized(msg) => ApiError::unauthorized(msg),
            crate::auth::AuthError::Provider(msg) => {
                tracing::error!("Auth provider error: {}", msg);
                ApiError::internal_server_error(
                    "An error occurred while contacting the identity service",
                )
            }
        }
    }
}

impl From<crate::services::content_service::ContentError> for ApiError {
    fn from(err: crate::services::content_service::ContentError) -> Self {
        use crate::services::content_service::ContentError;
        match err {
            ContentError::PostNotFound => {
                ApiError::not_found("Server could not find a requested post")
            }
            ContentError::CategoryNotFound => ApiError::not_found("Category not found"),
            ContentError::Database(e) => e.into(),
            ContentError::Manager(e) => e.into(),
        }
    }
}

impl From<crate::services::engagement_service::EngagementError> for ApiError {
    fn from(err: crate::services::engagement_service::EngagementError) -> Self {
        use crate::services::engagement_service::EngagementError;
        match err {
            EngagementError::PostNotFound => ApiError::not_found("Post not found"),
            EngagementError::EmptyComment => ApiError::validation_error("Content is required"),
            EngagementError::NotCommentOwner => {
                ApiError::forbidden("Not authorized to delete this comment")
            }
            EngagementError::Database(e) => e.into(),
            EngagementError::Manager(e) => e.into(),
        }
    }
}

impl From<crate::services::notification_service::NotificationError> for ApiError {
    fn from(err: crate::services::notification_service::NotificationError) -> Self {
        use crate::services::notification_service::NotificationError;
        match err {
            NotificationError::NotFound => {
                ApiError::not_found("Notification not found or user not authorized.")
            }
            NotificationError::Database(e) => e.into(),
            NotificationError::Manager(e) => e.into(),
        }
    }
}

impl From<crate::services::profile_service::ProfileError> for ApiError {
    fn from(err: crate::services::profile_service::ProfileError) -> Self {
        use crate::services::profile_service::ProfileError;
        match err {
            ProfileError::UsernameTaken => ApiError::conflict("This username is already taken"),
            ProfileError::ProfileNotFound => ApiError::not_found("User profile not found"),
            ProfileError::Database(e) => e.into(),
            ProfileError::Manager(e) => e.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_400() {
        // Duplicate username/email has always been a 400 to clients.
        let err = ApiError::conflict("This username is already taken");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn json_body_carries_message_and_code() {
        let err = ApiError::forbidden("Forbidden: You do not have admin access");
        let body = err.to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Forbidden: You do not have admin access");
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(ApiError::validation_error("x").status_code(), 400);
        assert_eq!(ApiError::unauthorized("x").status_code(), 401);
        assert_eq!(ApiError::forbidden("x").status_code(), 403);
        assert_eq!(ApiError::not_found("x").status_code(), 404);
        assert_eq!(ApiError::internal_server_error("x").status_code(), 500);
        assert_eq!(ApiError::service_unavailable("x").status_code(), 503);
    }

    #[test]
    fn invalid_credentials_surface_the_login_message() {
        let err: ApiError = crate::auth::AuthError::InvalidCredentials.into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.message(),
            "Your password is incorrect or this email doesn't exist"
        );
    }
}
