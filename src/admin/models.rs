// src/admin/models.rs

use serde::{Deserialize, Serialize};

/// Stock level below which a product counts as running low
pub const LOW_STOCK_THRESHOLD: i64 = 5;

// Dashboard models
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DashboardMetrics {
    pub total_users: i64,
    pub admin_users: i64,
    pub total_products: i64,
    pub active_products: i64,
    pub low_stock_products: i64,
    pub total_favorites: i64,
    pub cart_lines: i64,
    pub cart_units: i64,
    pub total_blogs: i64,
    pub total_reviews: i64,
    pub last_updated: String,
}
