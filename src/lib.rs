// src/lib.rs
//! Bakery storefront API: catalog, favorites, cart, blogs, reviews and the
//! admin console, plus a typed client for the storefront.

use axum::{
    extract::Extension,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::error;

// ============================================================================
// MODULES
// ============================================================================

pub mod admin;
pub mod auth;
pub mod blogs;
pub mod cart;
pub mod client;
pub mod common;
pub mod favorites;
pub mod logging_middleware;
pub mod products;

use common::{ApiError, SharedState};

/// GET /api/health - liveness plus a database round trip
async fn health_check(
    Extension(state_lock): Extension<SharedState>,
) -> Result<Json<Value>, ApiError> {
    let state = state_lock.read().await.clone();

    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Health check database probe failed");
            ApiError::DatabaseError(e)
        })?;

    Ok(Json(json!({ "status": "ok", "database": "ok" })))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}

/// Assemble every route group with the shared layers
pub fn build_router(state: SharedState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        // ====================================================================
        // AUTHENTICATION ROUTES
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // CATALOG ROUTES (Products, Categories, Reviews, Admin product management)
        // ====================================================================
        .merge(products::products_routes())
        // ====================================================================
        // SHOPPING ROUTES (Favorites, Cart)
        // ====================================================================
        .merge(favorites::favorites_routes())
        .merge(cart::cart_routes())
        // ====================================================================
        // CONTENT ROUTES
        // ====================================================================
        .merge(blogs::blogs_routes())
        // ====================================================================
        // ADMIN ROUTES (Dashboard)
        // ====================================================================
        .merge(admin::admin_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(state))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}
