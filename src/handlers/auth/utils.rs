use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug)]
pub struct RegisterFields {
    pub email: String,
    pub password: String,
    pub username: String,
    pub name: String,
}

/// Validate the register body. Checks run in a fixed order and the first
/// violation becomes the 400 message.
pub fn validate_register(payload: &Value) -> Result<RegisterFields, ApiError> {
    if !payload.is_object() {
        return Err(ApiError::validation_error("Request body is required"));
    }

    let email = require_string(payload, "email", "Email")?;
    if !email.contains('@') {
        return Err(ApiError::validation_error(
            "Email must be a valid email address",
        ));
    }

    let password = require_string(payload, "password", "Password")?;
    if password.len() < 6 {
        return Err(ApiError::validation_error(
            "Password must be at least 6 characters",
        ));
    }

    let username = require_string(payload, "username", "Username")?;
    if username.len() < 3 {
        return Err(ApiError::validation_error(
            "Username must be at least 3 characters",
        ));
    }

    let name = require_string(payload, "name", "Name")?;
    if name.len() < 2 {
        return Err(ApiError::validation_error(
            "Name must be at least 2 characters",
        ));
    }

    Ok(RegisterFields {
        email,
        password,
        username,
        name,
    })
}

pub fn validate_login(payload: &Value) -> Result<(String, String), ApiError> {
    if !payload.is_object() {
        return Err(ApiError::validation_error("Request body is required"));
    }
    let email = require_string(payload, "email", "Email")?;
    if !email.contains('@') {
        return Err(ApiError::validation_error(
            "Email must be a valid email address",
        ));
    }
    let password = require_string(payload, "password", "Password")?;
    Ok((email, password))
}

pub fn validate_reset_password(payload: &Value) -> Result<(String, String), ApiError> {
    if !payload.is_object() {
        return Err(ApiError::validation_error("Request body is required"));
    }
    let current = require_string(payload, "currentPassword", "Current password")?;
    let new = require_string(payload, "newPassword", "New password")?;
    if new.len() < 6 {
        return Err(ApiError::validation_error(
            "New password must be at least 6 characters",
        ));
    }
    Ok((current, new))
}

fn require_string(payload: &Value, key: &str, label: &str) -> Result<String, ApiError> {
    match payload.get(key) {
        None | Some(Value::Null) => Err(ApiError::validation_error(format!(
            "{} is required",
            label
        ))),
        Some(Value::String(s)) if s.is_empty() => {
            Err(ApiError::validation_error(format!("{} is required", label)))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ApiError::validation_error(format!(
            "{} must be a string",
            label
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_reports_first_violation_only() {
        let err = validate_register(&json!({})).unwrap_err();
        assert_eq!(err.message(), "Email is required");

        let err = validate_register(&json!({ "email": "nope" })).unwrap_err();
        assert_eq!(err.message(), "Email must be a valid email address");

        let err =
            validate_register(&json!({ "email": "a@b.co", "password": "short" })).unwrap_err();
        assert_eq!(err.message(), "Password must be at least 6 characters");

        let err = validate_register(
            &json!({ "email": "a@b.co", "password": "secret123", "username": "ab" }),
        )
        .unwrap_err();
        assert_eq!(err.message(), "Username must be at least 3 characters");
    }

    #[test]
    fn register_accepts_a_complete_body() {
        let fields = validate_register(&json!({
            "email": "a@b.co",
            "password": "secret123",
            "username": "somchai",
            "name": "Somchai"
        }))
        .unwrap();
        assert_eq!(fields.username, "somchai");
    }

    #[test]
    fn non_string_fields_are_type_errors() {
        let err = validate_register(&json!({ "email": 42 })).unwrap_err();
        assert_eq!(err.message(), "Email must be a string");
    }

    #[test]
    fn login_requires_both_fields() {
        let err = validate_login(&json!({ "email": "a@b.co" })).unwrap_err();
        assert_eq!(err.message(), "Password is required");
    }

    #[test]
    fn reset_password_checks_new_password_length() {
        let err = validate_reset_password(
            &json!({ "currentPassword": "oldpass", "newPassword": "tiny" }),
        )
        .unwrap_err();
        assert_eq!(err.message(), "New password must be at least 6 characters");
    }
}
