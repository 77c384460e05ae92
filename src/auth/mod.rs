use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Errors surfaced by the external identity provider
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Account record as the provider knows it. The provider owns email and
/// password; everything else lives in the app profile table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: String,
}

/// Seam around the external identity service. The HTTP implementation
/// talks to a GoTrue-style API; tests substitute their own.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a credential record; returns the provider-issued user id
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError>;

    /// Password grant; returns a bearer access token on success
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Resolve a bearer token to the account it belongs to
    async fn get_user(&self, token: &str) -> Result<ProviderUser, AuthError>;

    /// Update the password for the account the token belongs to
    async fn update_password(&self, token: &str, new_password: &str) -> Result<(), AuthError>;
}

/// HTTP client for the hosted identity service
pub struct HttpIdentityProvider {
    base_url: Url,
    api_key: String,
    http: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, AuthError> {
        // Url::join treats a path without a trailing slash as a file and
        // would drop the last segment, so normalize here.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| AuthError::Provider(format!("invalid provider URL: {}", e)))?;
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        })
    }

    pub fn from_env() -> Result<Self, AuthError> {
        let base_url = std::env::var("AUTH_PROVIDER_URL")
            .map_err(|_| AuthError::Provider("AUTH_PROVIDER_URL not configured".into()))?;
        let api_key = std::env::var("AUTH_PROVIDER_KEY").unwrap_or_default();
        Self::new(&base_url, api_key)
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::Provider(format!("invalid endpoint {}: {}", path, e)))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        let url = self.endpoint("signup")?;
        let res = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = res.status();
        let body: Value = res
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_signup_failure(status, &body));
        }
        parse_provider_user(&body)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let url = self.endpoint("token?grant_type=password")?;
        let res = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = res.status();
        let body: Value = res
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_token_failure(status, &body));
        }
        body.get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AuthError::Provider("token response missing access_token".into()))
    }

    async fn get_user(&self, token: &str) -> Result<ProviderUser, AuthError> {
        let url = self.endpoint("user")?;
        let res = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = res.status();
        if status.is_client_error() {
            return Err(AuthError::Unauthorized("Unauthorized or token expired".into()));
        }
        if !status.is_success() {
            return Err(AuthError::Provider(format!("get-user returned {}", status)));
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        parse_provider_user(&body)
    }

    async fn update_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let url = self.endpoint("user")?;
        let res = self
            .http
            .put(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .json(&json!({ "password": new_password }))
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::Unauthorized("Unauthorized: Invalid token".into()));
        }
        if !status.is_success() {
            return Err(AuthError::Provider(format!("password update returned {}", status)));
        }
        Ok(())
    }
}

/// Accepts both flat and `{ "user": { ... } }` response shapes
fn parse_provider_user(body: &Value) -> Result<ProviderUser, AuthError> {
    let user = body.get("user").unwrap_or(body);
    let id = user
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AuthError::Provider("provider response missing user id".into()))?;
    let email = user
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(ProviderUser { id, email })
}

fn classify_signup_failure(status: StatusCode, body: &Value) -> AuthError {
    let code = body.get("error_code").and_then(Value::as_str).unwrap_or("");
    let msg = provider_message(body);
    if code == "user_already_exists" || msg.contains("already registered") {
        return AuthError::DuplicateEmail;
    }
    AuthError::Provider(format!("signup failed ({}): {}", status, msg))
}

fn classify_token_failure(status: StatusCode, body: &Value) -> AuthError {
    let msg = provider_message(body);
    if status == StatusCode::BAD_REQUEST
        || status == StatusCode::UNAUTHORIZED
        || msg.contains("Invalid login credentials")
        || msg.contains("Invalid email or password")
    {
        return AuthError::InvalidCredentials;
    }
    AuthError::Provider(format!("sign-in failed ({}): {}", status, msg))
}

fn provider_message(body: &Value) -> String {
    for key in ["msg", "message", "error_description", "error"] {
        if let Some(s) = body.get(key).and_then(Value::as_str) {
            return s.to_string();
        }
    }
    body.to_string()
}

static PROVIDER: OnceLock<Arc<dyn IdentityProvider>> = OnceLock::new();

/// Process-wide provider handle, initialized lazily from the environment
pub fn provider() -> Arc<dyn IdentityProvider> {
    PROVIDER
        .get_or_init(|| {
            let provider = HttpIdentityProvider::from_env().unwrap_or_else(|e| {
                tracing::warn!("identity provider not configured: {}", e);
                // Keep the process serving public routes; protected routes
                // will fail closed with Unauthorized.
                HttpIdentityProvider::new("http://127.0.0.1:9999/", String::new())
                    .expect("static fallback URL")
            });
            Arc::new(provider)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_user_payload() {
        let body = json!({ "id": "11111111-1111-1111-1111-111111111111", "email": "a@b.co" });
        let user = parse_provider_user(&body).unwrap();
        assert_eq!(user.email, "a@b.co");
    }

    #[test]
    fn parses_nested_user_payload() {
        let body = json!({ "user": { "id": "11111111-1111-1111-1111-111111111111", "email": "a@b.co" } });
        let user = parse_provider_user(&body).unwrap();
        assert_eq!(user.id.to_string(), "11111111-1111-1111-1111-111111111111");
    }

    #[test]
    fn duplicate_email_detected_from_error_code() {
        let body = json!({ "error_code": "user_already_exists", "msg": "User already registered" });
        let err = classify_signup_failure(StatusCode::UNPROCESSABLE_ENTITY, &body);
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[test]
    fn duplicate_email_detected_from_message() {
        let body = json!({ "msg": "A user with this email address has already registered" });
        let err = classify_signup_failure(StatusCode::BAD_REQUEST, &body);
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[test]
    fn bad_password_maps_to_invalid_credentials() {
        let body = json!({ "error_description": "Invalid login credentials" });
        let err = classify_token_failure(StatusCode::BAD_REQUEST, &body);
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn provider_5xx_is_not_invalid_credentials() {
        let body = json!({ "msg": "upstream blew up" });
        let err = classify_token_failure(StatusCode::BAD_GATEWAY, &body);
        assert!(matches!(err, AuthError::Provider(_)));
    }
}
