// src/admin/handlers.rs

use axum::{extract::Extension, Json};
use sqlx::SqlitePool;
use tracing::{error, info};

use super::models::{DashboardMetrics, LOW_STOCK_THRESHOLD};
use crate::auth::AdminUser;
use crate::common::{ApiError, SharedState};

async fn count(db: &SqlitePool, sql: &str, metric: &str) -> Result<i64, ApiError> {
    sqlx::query_scalar::<_, i64>(sql)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                metric = metric,
                "Database error fetching dashboard metric"
            );
            ApiError::DatabaseError(e)
        })
}

/// GET /api/admin/dashboard/metrics - Store-wide counters
pub async fn get_dashboard_metrics(
    Extension(state_lock): Extension<SharedState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let state = state_lock.read().await.clone();
    let db = &state.db;

    info!(admin_user_id = %admin.id, "Fetching dashboard metrics");

    let low_stock_sql = format!(
        "SELECT COUNT(*) FROM products WHERE is_active = 1 AND stock < {}",
        LOW_STOCK_THRESHOLD
    );

    let metrics = DashboardMetrics {
        total_users: count(db, "SELECT COUNT(*) FROM users", "total_users").await?,
        admin_users: count(
            db,
            "SELECT COUNT(*) FROM users u JOIN roles r ON r.id = u.role_id WHERE r.name = 'admin'",
            "admin_users",
        )
        .await?,
        total_products: count(db, "SELECT COUNT(*) FROM products", "total_products").await?,
        active_products: count(
            db,
            "SELECT COUNT(*) FROM products WHERE is_active = 1",
            "active_products",
        )
        .await?,
        low_stock_products: count(db, &low_stock_sql, "low_stock_products").await?,
        total_favorites: count(db, "SELECT COUNT(*) FROM favorites", "total_favorites").await?,
        cart_lines: count(db, "SELECT COUNT(*) FROM cart_items", "cart_lines").await?,
        cart_units: count(
            db,
            "SELECT COALESCE(SUM(quantity), 0) FROM cart_items",
            "cart_units",
        )
        .await?,
        total_blogs: count(db, "SELECT COUNT(*) FROM blogs", "total_blogs").await?,
        total_reviews: count(db, "SELECT COUNT(*) FROM reviews", "total_reviews").await?,
        last_updated: chrono::Utc::now().to_rfc3339(),
    };

    Ok(Json(metrics))
}
