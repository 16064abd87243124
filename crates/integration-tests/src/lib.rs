//! Integration test harness for Tradepost.
//!
//! Tests run against an in-memory `SQLite` database and drive the real
//! router in-process via `tower::ServiceExt::oneshot`; no server or
//! external database is needed.
//!
//! The in-memory database only exists per connection, so the pool is
//! pinned to a single connection.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
    routing::get,
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use tradepost_storefront::config::StorefrontConfig;
use tradepost_storefront::state::AppState;
use tradepost_storefront::{db, middleware, routes};

/// Session secret for tests; entropy-checked config validation is not in
/// play here because the config is built directly.
const TEST_SESSION_SECRET: &str = "kX9mQ2vR7pL4wN8cJ5tY1bF6hD3gS0aZ";

/// Shared test fixture: a migrated in-memory database.
pub struct TestContext {
    pub pool: SqlitePool,
}

impl TestContext {
    /// Create a fresh in-memory database with the schema applied.
    pub async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self { pool }
    }

    /// Test configuration pointing at nothing external.
    #[must_use]
    pub fn config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost:8000".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            sentry_dsn: None,
        }
    }

    /// Build the full application router over this context's database.
    pub async fn router(&self) -> Router {
        let config = Self::config();

        let session_layer = middleware::create_session_layer(&self.pool, &config)
            .await
            .expect("Failed to create session store");

        let state = AppState::new(config, self.pool.clone());

        Router::new()
            .route("/health", get(|| async { "ok" }))
            .merge(routes::routes())
            .layer(session_layer)
            .with_state(state)
    }

    /// Seed a small category tree: Books and Electronics at the top
    /// level, Fiction under Books.
    pub async fn seed_categories(&self) {
        for (name, parent) in [
            ("Books", "Root"),
            ("Electronics", "Root"),
            ("Fiction", "Books"),
        ] {
            sqlx::query("INSERT INTO categories (name, parent) VALUES (?1, ?2)")
                .bind(name)
                .bind(parent)
                .execute(&self.pool)
                .await
                .expect("Failed to seed category");
        }
    }

    /// Give an account a seller record so the management pages open up.
    pub async fn make_seller(&self, email: &str) {
        sqlx::query("INSERT INTO sellers (email) VALUES (?1)")
            .bind(email)
            .execute(&self.pool)
            .await
            .expect("Failed to insert seller record");
    }
}

/// Send a GET request through the router.
pub async fn get_path(router: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::empty()).expect("Failed to build request");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed")
}

/// Send a POST request with a form-encoded body through the router.
pub async fn post_form(
    router: &Router,
    path: &str,
    body: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    router
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed")
}

/// Extract the session cookie pair from a response, if one was set.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(ToString::to_string)
}

/// The Location header of a redirect response.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)?
        .to_str()
        .ok()
        .map(ToString::to_string)
}

/// Read the full response body as a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Assert a response is a redirect to the given path.
pub fn assert_redirect(response: &Response<Body>, expected: &str) {
    assert!(
        response.status() == StatusCode::SEE_OTHER || response.status() == StatusCode::FOUND,
        "expected redirect, got {}",
        response.status()
    );
    assert_eq!(location(response).as_deref(), Some(expected));
}
