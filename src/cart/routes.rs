// src/cart/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn cart_routes() -> Router {
    Router::new().route(
        "/api/cart",
        get(handlers::get_cart)
            .post(handlers::add_to_cart)
            .put(handlers::update_cart_item)
            .delete(handlers::remove_from_cart),
    )
}
