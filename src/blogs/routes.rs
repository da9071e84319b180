// src/blogs/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn blogs_routes() -> Router {
    Router::new()
        .route(
            "/api/blogs",
            get(handlers::list_blogs).post(handlers::create_blog),
        )
        .route("/api/blogs/:slug", get(handlers::get_blog))
}
