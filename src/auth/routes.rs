//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/register` - Create an account and start a session
/// - `POST /api/auth/log-in` - Start a session
/// - `POST /api/auth/log-out` - Expire the session cookies
/// - `GET /api/auth/me` - Current user
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/log-in", post(handlers::log_in))
        .route("/api/auth/log-out", post(handlers::log_out))
        .route("/api/auth/me", get(handlers::me))
}
