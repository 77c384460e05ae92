mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Every protected route must fail closed before touching the store when
/// no token is supplied.
#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for (method, path) in [
        ("GET", "/auth/get-user"),
        ("PUT", "/auth/update-profile"),
        ("PUT", "/auth/reset-password"),
        ("GET", "/notifications"),
        ("PUT", "/notifications/read-all"),
        ("GET", "/posts/admin"),
        ("GET", "/posts/1/like-status"),
        ("POST", "/posts/1/like"),
        ("DELETE", "/posts/1/comments/1"),
        ("POST", "/categories"),
        ("DELETE", "/categories/1"),
    ] {
        let url = format!("{}{}", server.base_url, path);
        let req = match method {
            "GET" => client.get(&url),
            "POST" => client.post(&url).json(&json!({})),
            "PUT" => client.put(&url).json(&json!({})),
            "DELETE" => client.delete(&url),
            _ => unreachable!(),
        };
        let res = req.send().await?;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should be 401 without a token",
            method,
            path
        );
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["message"], "Unauthorized: Token missing");
    }
    Ok(())
}

#[tokio::test]
async fn non_bearer_auth_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/auth/get-user", server.base_url))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

/// Shape validation happens before any provider call, so these hold even
/// with no identity service configured.
#[tokio::test]
async fn register_validates_shape_first() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Email is required");

    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "email": "a@b.co",
            "password": "secret123",
            "username": "ab",
            "name": "Somchai"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Username must be at least 3 characters");
    Ok(())
}

#[tokio::test]
async fn login_validates_shape_first() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": "not-an-email", "password": "x" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Email must be a valid email address");
    Ok(())
}
