use axum::{
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use brewlog_api::config;
use brewlog_api::database::DatabaseManager;
use brewlog_api::handlers::{auth, categories, engagement, notifications, posts};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_PROVIDER_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting brewlog API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("brewlog API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(post_routes())
        .merge(category_routes())
        .merge(notification_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/get-user", get(auth::get_user))
        .route(
            "/auth/reset-password",
            post(auth::reset_password).put(auth::reset_password),
        )
        .route("/auth/update-profile", put(auth::update_profile))
}

fn post_routes() -> Router {
    Router::new()
        .route("/posts", get(posts::list).post(posts::create))
        .route("/posts/admin", get(posts::list_admin))
        .route(
            "/posts/:post_id",
            get(posts::get).put(posts::update).delete(posts::remove),
        )
        .route("/posts/:post_id/like-status", get(engagement::likes::status))
        .route("/posts/:post_id/like", post(engagement::likes::toggle))
        .route(
            "/posts/:post_id/comments",
            get(engagement::comments::list).post(engagement::comments::create),
        )
        .route(
            "/posts/:post_id/comments/:comment_id",
            delete(engagement::comments::remove),
        )
}

fn category_routes() -> Router {
    Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::remove),
        )
}

fn notification_routes() -> Router {
    Router::new()
        .route("/notifications", get(notifications::list))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route(
            "/notifications/:notification_id/read",
            put(notifications::mark_read),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "brewlog API",
        "version": version,
        "description": "Blog platform backend - articles, categories, engagement, and notifications",
        "endpoints": {
            "home": "/ (public)",
            "auth": "/auth/register, /auth/login (public), /auth/get-user, /auth/update-profile, /auth/reset-password (user)",
            "posts": "/posts (public list), /posts/admin (admin), /posts/:id, /posts/:id/like, /posts/:id/comments",
            "categories": "/categories (public read, admin write)",
            "notifications": "/notifications, /notifications/:id/read, /notifications/read-all (user)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
