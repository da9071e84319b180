// src/admin/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn admin_routes() -> Router {
    Router::new().route(
        "/api/admin/dashboard/metrics",
        get(handlers::get_dashboard_metrics),
    )
}
