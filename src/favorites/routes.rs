// src/favorites/routes.rs

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

pub fn favorites_routes() -> Router {
    Router::new()
        .route(
            "/api/favorites",
            get(handlers::list_favorites).post(handlers::add_favorite),
        )
        .route("/api/favorites/bulk", post(handlers::bulk_merge_favorites))
        .route(
            "/api/favorites/:product_id",
            delete(handlers::remove_favorite),
        )
}
