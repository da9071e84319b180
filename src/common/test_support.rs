// Shared fixtures for in-memory database tests

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

use super::{migrations::run_migrations, AppConfig, AppState, SharedState};
use crate::auth::{password::hash_password, tokens::issue_token, Role};

pub const TEST_SECRET: &str = "test_secret_key_for_sessions";

/// Single-connection in-memory database so every query sees the same data
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

pub async fn migrated_pool() -> SqlitePool {
    let pool = memory_pool().await;
    run_migrations(&pool, false).await.unwrap();
    pool
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "ADMIN_EMAILS" => Some("owner@bakery.test".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn shared_state(pool: SqlitePool) -> SharedState {
    Arc::new(RwLock::new(AppState::new(pool, &test_config())))
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = migrated_pool().await;
    let router = crate::build_router(shared_state(pool.clone()), &[]);
    (router, pool)
}

/// Insert a user directly and return its id
pub async fn create_user(pool: &SqlitePool, email: &str, role: Role) -> String {
    let id = crate::common::generate_user_id();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash, role_id)
        VALUES (?, ?, 'Test User', ?, (SELECT id FROM roles WHERE name = ?))
        "#,
    )
    .bind(&id)
    .bind(email)
    .bind(hash_password("correct horse battery").unwrap())
    .bind(role.as_str())
    .execute(pool)
    .await
    .unwrap();
    id
}

pub fn token_for(user_id: &str, role: Role) -> String {
    issue_token(TEST_SECRET, user_id, role, 1).unwrap()
}

/// Insert a product row directly and return its id
pub async fn insert_product(pool: &SqlitePool, id: &str, name: &str, price_cents: i64) -> String {
    sqlx::query(
        r#"
        INSERT INTO products (id, name, slug, price_cents, stock, category_id)
        VALUES (?, ?, ?, ?, 10, (SELECT id FROM categories WHERE slug = 'breads'))
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(crate::common::slug::slugify(name) + "-" + id)
    .bind(price_cents)
    .execute(pool)
    .await
    .unwrap();
    id.to_string()
}

/// Send a request through the router, returning status and JSON body
/// (`Value::Null` when the body is empty, a string for non-JSON bodies)
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}
