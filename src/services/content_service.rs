use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Category, Post, PostListItem, PostWithAuthor};

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Post not found")]
    PostNotFound,
    #[error("Category not found")]
    CategoryNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

/// Filters for the paginated article list
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub page: i64,
    pub limit: i64,
    pub category: Option<String>,
    pub keyword: Option<String>,
    /// Admin view: drafts included alongside published posts
    pub include_drafts: bool,
}

/// One page of the article list, with the pagination envelope the client
/// renders directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub total_posts: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
    pub posts: Vec<PostListItem>,
    pub next_page: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub image: String,
    pub category_id: i32,
    pub description: String,
    pub content: String,
    pub status_id: i32,
}

/// Partial post update; only supplied fields are written
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status_id: Option<i32>,
    pub date: Option<DateTime<Utc>>,
    pub likes_count: Option<i32>,
}

/// What update_post saw before writing, so the caller can detect a
/// draft-to-published transition and trigger the new-post fan-out.
#[derive(Debug, Clone, Copy)]
pub struct UpdateOutcome {
    pub previous_status: i32,
    pub author_id: Uuid,
}

pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub async fn new() -> Result<Self, ContentError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Filtered, paginated, reverse-chronological article list. Category is
    /// matched by exact name through the join; keyword is a case-insensitive
    /// substring match across title, description and content.
    pub async fn list_posts(&self, query: PostQuery) -> Result<PostPage, ContentError> {
        let mut conditions: Vec<String> = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if !query.include_drafts {
            conditions.push(format!(
                "p.status_id = {}",
                crate::database::models::STATUS_PUBLISHED
            ));
        }
        if let Some(category) = &query.category {
            args.push(category.clone());
            conditions.push(format!("c.name = ${}", args.len()));
        }
        if let Some(keyword) = &query.keyword {
            args.push(like_pattern(keyword));
            let n = args.len();
            conditions.push(format!(
                "(p.title ILIKE ${n} OR p.description ILIKE ${n} OR p.content ILIKE ${n})"
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT COUNT(*) FROM posts p JOIN categories c ON c.id = p.category_id{}",
            where_clause
        );
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_query = count_query.bind(arg);
        }
        let total_posts = count_query.fetch_one(&self.pool).await?;

        let page_sql = format!(
            r#"
            SELECT p.id, p.image, p.title, p.description, p.date, p.content,
                   p.status_id, p.likes_count, c.name AS category
            FROM posts p
            JOIN categories c ON c.id = p.category_id{}
            ORDER BY p.date DESC
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            args.len() + 1,
            args.len() + 2
        );
        let mut page_query = sqlx::query_as::<_, PostListItem>(&page_sql);
        for arg in &args {
            page_query = page_query.bind(arg);
        }
        let posts = page_query
            .bind(query.limit)
            .bind((query.page - 1) * query.limit)
            .fetch_all(&self.pool)
            .await?;

        let total_pages = total_pages(total_posts, query.limit);
        let next_page = (query.page < total_pages).then(|| query.page + 1);

        Ok(PostPage {
            total_posts,
            total_pages,
            current_page: query.page,
            limit: query.limit,
            posts,
            next_page,
        })
    }

    /// Single article with the author profile flattened in
    pub async fn get_post(&self, id: i32) -> Result<PostWithAuthor, ContentError> {
        sqlx::query_as::<_, PostWithAuthor>(
            r#"
            SELECT p.id, p.title, p.description, p.content, p.image,
                   p.category_id, p.status_id, p.date, p.likes_count,
                   u.id AS author_id, u.name AS author,
                   u.bio AS author_bio, u.profile_pic AS author_avatar
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ContentError::PostNotFound)
    }

    pub async fn create_post(&self, author_id: Uuid, fields: NewPost) -> Result<Post, ContentError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, image, category_id, description, content,
                               status_id, user_id, date, likes_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now(), 0)
            RETURNING id, title, description, content, image, category_id,
                      user_id, status_id, date, likes_count
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.image)
        .bind(fields.category_id)
        .bind(&fields.description)
        .bind(&fields.content)
        .bind(fields.status_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    /// Partial update. Returns the pre-update status and author so the
    /// handler can detect a publish transition.
    pub async fn update_post(&self, id: i32, patch: PostPatch) -> Result<UpdateOutcome, ContentError> {
        let existing: Option<(i32, Uuid)> =
            sqlx::query_as("SELECT status_id, user_id FROM posts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let (previous_status, author_id) = existing.ok_or(ContentError::PostNotFound)?;

        sqlx::query(
            r#"
            UPDATE posts SET
                title       = COALESCE($2, title),
                content     = COALESCE($3, content),
                category_id = COALESCE($4, category_id),
                description = COALESCE($5, description),
                image       = COALESCE($6, image),
                status_id   = COALESCE($7, status_id),
                date        = COALESCE($8, date),
                likes_count = COALESCE($9, likes_count)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.content)
        .bind(patch.category_id)
        .bind(patch.description)
        .bind(patch.image)
        .bind(patch.status_id)
        .bind(patch.date)
        .bind(patch.likes_count)
        .execute(&self.pool)
        .await?;

        Ok(UpdateOutcome {
            previous_status,
            author_id,
        })
    }

    /// Idempotent: deleting an already-gone post is a no-op success
    pub async fn delete_post(&self, id: i32) -> Result<u64, ContentError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ContentError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    pub async fn get_category(&self, id: i32) -> Result<Category, ContentError> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ContentError::CategoryNotFound)
    }

    pub async fn create_category(&self, name: &str) -> Result<Category, ContentError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn update_category(&self, id: i32, name: &str) -> Result<Category, ContentError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ContentError::CategoryNotFound)
    }

    /// Idempotent: deleting an already-gone category is a no-op success
    pub async fn delete_category(&self, id: i32) -> Result<u64, ContentError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Clamp a client-supplied page number to 1-based
pub fn normalize_page(page: Option<i64>) -> i64 {
    page.filter(|p| *p >= 1).unwrap_or(1)
}

/// Clamp a client-supplied page size to [1, max_limit], defaulting from config
pub fn normalize_limit(limit: Option<i64>) -> i64 {
    let pagination = &config::config().pagination;
    limit
        .unwrap_or(pagination.default_limit)
        .clamp(1, pagination.max_limit)
}

fn total_pages(total: i64, limit: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (total + limit - 1) / limit
    }
}

/// Wrap a keyword in ILIKE wildcards, escaping any the user typed so a
/// literal `%`/`_` in the search box matches itself.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_arithmetic_matches_the_thirteen_post_case() {
        // 13 published posts at limit 6 paginate as 6 / 6 / 1
        assert_eq!(total_pages(13, 6), 3);
        assert_eq!(total_pages(12, 6), 2);
        assert_eq!(total_pages(1, 6), 1);
        assert_eq!(total_pages(0, 6), 0);
    }

    #[test]
    fn page_past_the_end_is_allowed() {
        // page=4 of 3 produces an empty window, not an error
        let total = total_pages(13, 6);
        assert!(4 > total);
        assert_eq!((4 - 1) * 6, 18); // offset beyond the 13 rows
    }

    #[test]
    fn page_normalization() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(0)), 1);
        assert_eq!(normalize_page(Some(-3)), 1);
        assert_eq!(normalize_page(Some(7)), 7);
    }

    #[test]
    fn keyword_pattern_is_case_insensitive_substring() {
        // ILIKE '%brew%' matches "Brewing Basics"; the case folding is
        // done by the operator, the pattern just wraps the needle.
        assert_eq!(like_pattern("brew"), "%brew%");
    }

    #[test]
    fn keyword_wildcards_are_escaped() {
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }

    #[test]
    fn next_page_only_when_more_rows_remain() {
        let pages = total_pages(13, 6);
        assert_eq!((1 < pages).then(|| 2), Some(2));
        assert_eq!((3 < pages).then(|| 4), None);
    }
}
