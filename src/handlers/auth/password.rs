use axum::response::Json;
use serde_json::{json, Value};

use super::utils::validate_reset_password;
use crate::auth::{self, AuthError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// PUT /auth/reset-password - Change the caller's password.
///
/// Ownership is confirmed by re-authenticating with the current password
/// before the provider-side update; a wrong current password is a 400,
/// distinct from the 401 an invalid token produces.
pub async fn reset_password(
    user: AuthUser,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let (current_password, new_password) = validate_reset_password(&payload)?;

    if let Err(e) = auth::provider().sign_in(&user.email, &current_password).await {
        return Err(match e {
            AuthError::InvalidCredentials => {
                ApiError::bad_request("Current password is incorrect")
            }
            other => other.into(),
        });
    }

    auth::provider()
        .update_password(&user.token, &new_password)
        .await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}
