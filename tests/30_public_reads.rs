mod common;

use anyhow::Result;
use reqwest::StatusCode;

/// These tests exercise the public read surface against the database named
/// by DATABASE_URL (migrated via `brewlog migrate`). When no database is
/// reachable they skip rather than fail, like the health check they probe.
async fn database_available(base_url: &str) -> Result<bool> {
    let res = reqwest::Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await?;
    Ok(res.status() == StatusCode::OK)
}

#[tokio::test]
async fn categories_listing_is_public() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let res = reqwest::Client::new()
        .get(format!("{}/categories", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body.is_array(), "categories should be an array: {}", body);
    Ok(())
}

#[tokio::test]
async fn post_listing_carries_the_pagination_envelope() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let res = reqwest::Client::new()
        .get(format!("{}/posts?limit=6", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    for key in ["totalPosts", "totalPages", "currentPage", "limit", "posts"] {
        assert!(body.get(key).is_some(), "missing {}: {}", key, body);
    }
    assert_eq!(body["limit"], 6);
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let res = reqwest::Client::new()
        .get(format!("{}/posts?page=9999&limit=6", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["posts"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["nextPage"], serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn missing_post_is_a_404() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let res = reqwest::Client::new()
        .get(format!("{}/posts/999999999", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_numeric_post_id_is_a_400() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .get(format!("{}/posts/not-a-number", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
