use axum::extract::Query;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::AdminUser;
use crate::services::content_service::{
    normalize_limit, normalize_page, ContentService, PostPage, PostQuery,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub keyword: Option<String>,
}

/// GET /posts - Public article list: published only, newest first,
/// filterable by category name and keyword.
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<PostPage>, ApiError> {
    let service = ContentService::new().await?;
    let page = service
        .list_posts(to_post_query(query, false))
        .await?;
    Ok(Json(page))
}

/// GET /posts/admin - Same list with drafts included; admin only.
pub async fn list_admin(
    AdminUser(_admin): AdminUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<PostPage>, ApiError> {
    let service = ContentService::new().await?;
    let page = service.list_posts(to_post_query(query, true)).await?;
    Ok(Json(page))
}

fn to_post_query(query: ListQuery, include_drafts: bool) -> PostQuery {
    PostQuery {
        page: normalize_page(query.page),
        limit: normalize_limit(query.limit),
        category: none_if_blank(query.category),
        keyword: none_if_blank(query.keyword),
        include_drafts,
    }
}

/// Treat `?category=` and friends as absent filters
fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_dropped() {
        assert_eq!(none_if_blank(Some("".into())), None);
        assert_eq!(none_if_blank(Some("  ".into())), None);
        assert_eq!(none_if_blank(Some("Cat".into())), Some("Cat".into()));
        assert_eq!(none_if_blank(None), None);
    }

    #[test]
    fn query_defaults_and_clamps() {
        let q = to_post_query(
            ListQuery {
                page: None,
                limit: None,
                category: None,
                keyword: None,
            },
            false,
        );
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 6);
        assert!(!q.include_drafts);
    }
}
