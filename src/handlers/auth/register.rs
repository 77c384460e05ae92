use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

use super::utils::validate_register;
use crate::auth::{self, AuthError};
use crate::error::ApiError;
use crate::services::profile_service::ProfileService;

/// POST /auth/register - Create an account
///
/// The credential record is created at the identity provider, then the
/// app-level profile row is inserted with the provider-issued id. The two
/// writes are not atomic: if the profile insert fails, a credential record
/// without a profile remains at the provider. That partial state is logged
/// and surfaced as a 500.
pub async fn register(Json(payload): Json<Value>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let fields = validate_register(&payload)?;

    // Pre-check only; the unique index on username is the real arbiter when
    // two registrations race.
    let profiles = ProfileService::new().await?;
    if profiles.username_taken(&fields.username, None).await? {
        return Err(ApiError::conflict("This username is already taken"));
    }

    let account = match auth::provider()
        .sign_up(&fields.email, &fields.password)
        .await
    {
        Ok(account) => account,
        Err(AuthError::DuplicateEmail) => {
            return Err(ApiError::conflict("User with this email already exists"));
        }
        Err(AuthError::Provider(msg)) => {
            tracing::error!("Provider sign-up failed: {}", msg);
            return Err(ApiError::bad_request(
                "Failed to create user. Please try again.",
            ));
        }
        Err(other) => return Err(other.into()),
    };

    let profile = profiles
        .create(account.id, &fields.username, &fields.name)
        .await
        .map_err(|e| {
            tracing::error!(
                "Profile insert failed after provider sign-up for {}: {}",
                account.id,
                e
            );
            ApiError::internal_server_error("Failed to create user profile")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": profile,
        })),
    ))
}
