use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::database::models::user::ROLE_ADMIN;
use crate::database::DatabaseManager;
use crate::error::ApiError;

/// Caller identity resolved for one request: the provider-validated token
/// plus the role re-fetched from the profile table. Never cached across
/// requests, so a role change takes effect on the very next call.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Same resolution as AuthUser, then requires the admin role.
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_identity(&parts.headers).await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = resolve_identity(&parts.headers).await?;
        if !user.is_admin() {
            return Err(ApiError::forbidden(
                "Forbidden: You do not have admin access",
            ));
        }
        Ok(AdminUser(user))
    }
}

/// Token -> provider account -> profile role, in that order. The token is
/// validated against the provider on every request; the role comes from the
/// users table, never from the token itself.
async fn resolve_identity(headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = extract_bearer(headers)?;

    let account = crate::auth::provider().get_user(&token).await?;

    let pool = DatabaseManager::pool().await?;
    let role: Option<String> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(account.id)
        .fetch_optional(&pool)
        .await?;

    let role = role.ok_or_else(|| ApiError::not_found("User role not found"))?;

    Ok(AuthUser {
        id: account.id,
        email: account.email,
        role,
        token,
    })
}

/// Extract the bearer token from the Authorization header
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Unauthorized: Token missing"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        Some(_) => Err(ApiError::unauthorized("Unauthorized: Token missing")),
        None => Err(ApiError::unauthorized(
            "Authorization header must use Bearer token format",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert("authorization", HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = extract_bearer(&headers_with(None)).unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "Unauthorized: Token missing");
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = extract_bearer(&headers_with(Some("Basic abc123"))).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = extract_bearer(&headers_with(Some("Bearer   "))).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn bearer_token_is_extracted() {
        let token = extract_bearer(&headers_with(Some("Bearer abc.def.ghi"))).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn admin_check_uses_profile_role() {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            role: "user".into(),
            token: "t".into(),
        };
        assert!(!user.is_admin());
        let admin = AuthUser {
            role: "admin".into(),
            ..user
        };
        assert!(admin.is_admin());
    }
}
