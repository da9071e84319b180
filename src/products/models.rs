// src/products/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

// ============================================================================
// Product Models
// ============================================================================

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Columns selected for every `Product` query; alias `p` is `products`
pub const PRODUCT_SELECT: &str = r#"
    SELECT
        p.id, p.name, p.slug, p.description, p.price_cents, p.stock, p.category_id,
        c.name AS category_name, c.slug AS category_slug, p.image_url, p.is_active,
        (SELECT AVG(rv.rating) FROM reviews rv WHERE rv.product_id = p.id) AS average_rating,
        (SELECT COUNT(*) FROM reviews rv WHERE rv.product_id = p.id) AS review_count,
        p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct ProductQueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Named sort orders accepted by `GET /api/products`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl ProductSort {
    pub fn order_by(&self) -> &'static str {
        match self {
            ProductSort::Newest => "p.created_at DESC, p.id DESC",
            ProductSort::Oldest => "p.created_at ASC, p.id ASC",
            ProductSort::PriceAsc => "p.price_cents ASC, p.id ASC",
            ProductSort::PriceDesc => "p.price_cents DESC, p.id ASC",
            ProductSort::NameAsc => "p.name COLLATE NOCASE ASC, p.id ASC",
            ProductSort::NameDesc => "p.name COLLATE NOCASE DESC, p.id ASC",
        }
    }
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(ProductSort::Newest),
            "oldest" => Ok(ProductSort::Oldest),
            "price_asc" => Ok(ProductSort::PriceAsc),
            "price_desc" => Ok(ProductSort::PriceDesc),
            "name_asc" => Ok(ProductSort::NameAsc),
            "name_desc" => Ok(ProductSort::NameDesc),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: Option<i64>,
    /// Category slug
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price_cents.is_none()
            && self.stock.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.is_active.is_none()
    }
}

#[derive(Deserialize, Debug)]
pub struct BulkProductDelete {
    pub ids: Vec<String>,
}

#[derive(Serialize, Debug, Default)]
pub struct BulkDeleteResult {
    pub deleted: Vec<String>,
    pub not_found: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct BestSellingParams {
    pub limit: Option<i64>,
}

// ============================================================================
// Category Models
// ============================================================================

#[derive(FromRow, Serialize, Debug)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub product_count: i64,
}

// ============================================================================
// Review Models
// ============================================================================

#[derive(FromRow, Serialize, Debug)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: String,
    pub author_name: Option<String>,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateReview {
    pub rating: i64,
    pub comment: Option<String>,
}
