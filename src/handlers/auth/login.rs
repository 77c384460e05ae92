use axum::response::Json;
use serde_json::{json, Value};

use super::utils::validate_login;
use crate::auth;
use crate::error::ApiError;

/// POST /auth/login - Authenticate against the identity provider and hand
/// back its bearer token. The provider's generic invalid-credential error
/// is translated into the message the login form shows.
pub async fn login(Json(payload): Json<Value>) -> Result<Json<Value>, ApiError> {
    let (email, password) = validate_login(&payload)?;

    let access_token = auth::provider().sign_in(&email, &password).await?;

    Ok(Json(json!({
        "message": "Signed in successfully",
        "access_token": access_token,
    })))
}
