use axum::{extract::Path, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::database::models::Category;
use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::services::content_service::ContentService;

/// GET /categories - All categories, name-ordered
pub async fn list() -> Result<Json<Vec<Category>>, ApiError> {
    let service = ContentService::new().await?;
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// GET /categories/:id
pub async fn get(Path(id): Path<i32>) -> Result<Json<Category>, ApiError> {
    let service = ContentService::new().await?;
    let category = service.get_category(id).await?;
    Ok(Json(category))
}

/// POST /categories - Admin only
pub async fn create(
    AdminUser(_admin): AdminUser,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = validate_category_name(&payload)?;
    let service = ContentService::new().await?;
    let category = service.create_category(&name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category created successfully",
            "data": category,
        })),
    ))
}

/// PUT /categories/:id - Admin only
pub async fn update(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let name = validate_category_name(&payload)?;
    let service = ContentService::new().await?;
    let category = service.update_category(id, &name).await?;
    Ok(Json(json!({
        "message": "Category updated successfully",
        "data": category,
    })))
}

/// DELETE /categories/:id - Admin only; absent category is a no-op
pub async fn remove(
    AdminUser(_admin): AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = ContentService::new().await?;
    service.delete_category(id).await?;
    Ok(Json(json!({ "message": "Deleted category successfully" })))
}

/// Name uniqueness is a soft check at the UI level; here only shape and
/// minimum length are enforced.
fn validate_category_name(payload: &Value) -> Result<String, ApiError> {
    match payload.get("name") {
        None | Some(Value::Null) => Err(ApiError::validation_error("Name is required")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ApiError::validation_error("Name is required"))
        }
        Some(Value::String(s)) if s.trim().len() < 2 => Err(ApiError::validation_error(
            "Name must be at least 2 characters",
        )),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ApiError::validation_error("Name must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_name_minimum_length() {
        let err = validate_category_name(&json!({ "name": "a" })).unwrap_err();
        assert_eq!(err.message(), "Name must be at least 2 characters");
        assert_eq!(
            validate_category_name(&json!({ "name": " Espresso " })).unwrap(),
            "Espresso"
        );
    }

    #[test]
    fn category_name_required_and_typed() {
        let err = validate_category_name(&json!({})).unwrap_err();
        assert_eq!(err.message(), "Name is required");
        let err = validate_category_name(&json!({ "name": 3 })).unwrap_err();
        assert_eq!(err.message(), "Name must be a string");
    }
}
