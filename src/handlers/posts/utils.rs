use serde_json::Value;

use crate::error::ApiError;
use crate::services::content_service::{NewPost, PostPatch};

/// Validate a create-post body: every content field is required and typed.
/// Checks run in a fixed order; the first violation becomes the 400 message.
pub fn validate_new_post(payload: &Value) -> Result<NewPost, ApiError> {
    let title = required_string(payload, "title", "Title")?;
    let image = required_string(payload, "image", "Image")?;
    let category_id = required_number(payload, "category_id", "Category_id")?;
    let description = required_string(payload, "description", "Description")?;
    let content = required_string(payload, "content", "Content")?;
    let status_id = required_number(payload, "status_id", "Status_id")?;

    Ok(NewPost {
        title,
        image,
        category_id,
        description,
        content,
        status_id,
    })
}

/// Validate an update-post body: every field is optional, but any supplied
/// field must have the right type.
pub fn validate_post_patch(payload: &Value) -> Result<PostPatch, ApiError> {
    optional_string(payload, "title", "Title")?;
    optional_string(payload, "image", "Image")?;
    optional_number(payload, "category_id", "Category_id")?;
    optional_string(payload, "description", "Description")?;
    optional_string(payload, "content", "Content")?;
    optional_number(payload, "status_id", "Status_id")?;

    serde_json::from_value(payload.clone())
        .map_err(|e| ApiError::validation_error(format!("Invalid request body: {}", e)))
}

fn required_string(payload: &Value, key: &str, label: &str) -> Result<String, ApiError> {
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

fn required_number(payload: &Value, key: &str, label: &str) -> Result<i32, ApiError> {
    match payload.get(key) {
        None | Some(Value::Null) => Err(ApiError::validation_error(format!(
            "{} is required",
            label
        ))),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|v| v as i32)
            .ok_or_else(|| ApiError::validation_error(format!("{} must be a number", label))),
        Some(_) => Err(ApiError::validation_error(format!(
            "{} must be a number",
            label
        ))),
    }
}

fn optional_string(payload: &Value, key: &str, label: &str) -> Result<(), ApiError> {
    match payload.get(key) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ApiError::validation_error(format!(
            "{} must be a string",
            label
        ))),
    }
}

fn optional_number(payload: &Value, key: &str, label: &str) -> Result<(), ApiError> {
    match payload.get(key) {
        None | Some(Value::Null) | Some(Value::Number(_)) => Ok(()),
        Some(_) => Err(ApiError::validation_error(format!(
            "{} must be a number",
            label
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_body() -> Value {
        json!({
            "title": "Brewing Basics",
            "image": "https://cdn.example.com/brew.jpg",
            "category_id": 1,
            "description": "Where to start with pour-over",
            "content": "Grind, bloom, pour.",
            "status_id": 1
        })
    }

    #[test]
    fn create_requires_every_field_in_order() {
        let err = validate_new_post(&json!({})).unwrap_err();
        assert_eq!(err.message(), "Title is required");

        let mut body = complete_body();
        body.as_object_mut().unwrap().remove("category_id");
        let err = validate_new_post(&body).unwrap_err();
        assert_eq!(err.message(), "Category_id is required");
    }

    #[test]
    fn create_rejects_wrong_types() {
        let mut body = complete_body();
        body["category_id"] = json!("one");
        let err = validate_new_post(&body).unwrap_err();
        assert_eq!(err.message(), "Category_id must be a number");

        let mut body = complete_body();
        body["title"] = json!(5);
        let err = validate_new_post(&body).unwrap_err();
        assert_eq!(err.message(), "Title must be a string");
    }

    #[test]
    fn create_accepts_a_complete_body() {
        let post = validate_new_post(&complete_body()).unwrap();
        assert_eq!(post.title, "Brewing Basics");
        assert_eq!(post.status_id, 1);
    }

    #[test]
    fn patch_accepts_partial_bodies() {
        let patch = validate_post_patch(&json!({ "status_id": 1 })).unwrap();
        assert_eq!(patch.status_id, Some(1));
        assert!(patch.title.is_none());
    }

    #[test]
    fn patch_rejects_wrong_types_on_supplied_fields() {
        let err = validate_post_patch(&json!({ "status_id": "published" })).unwrap_err();
        assert_eq!(err.message(), "Status_id must be a number");
    }
}
