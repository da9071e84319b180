// src/products/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

/// Create the products router: public catalog, reviews and admin management
pub fn products_routes() -> Router {
    Router::new()
        // Public routes
        // NOTE: /best-selling must be registered next to /:slug; axum prefers the static segment
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/best-selling", get(handlers::best_selling))
        .route("/api/products/:slug", get(handlers::get_product))
        .route(
            "/api/products/:slug/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        .route("/api/categories", get(handlers::list_categories))
        // Admin product management routes
        .route("/api/admin/products", post(handlers::admin_create_product))
        .route(
            "/api/admin/products/bulk-delete",
            post(handlers::bulk_delete_products),
        )
        .route(
            "/api/admin/products/:id",
            get(handlers::admin_get_product)
                .put(handlers::admin_update_product)
                .delete(handlers::admin_delete_product),
        )
}
