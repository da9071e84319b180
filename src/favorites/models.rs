// src/favorites/models.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Storage format for `favorites.created_at`, matching SQLite `datetime('now')`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Upper bound on items accepted by one bulk import
pub const MAX_BULK_FAVORITES: usize = 200;

/// A favorited product as shown in the wishlist
#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Favorite {
    pub product_id: String,
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub stock: i64,
    pub added_at: String,
}

pub const FAVORITE_SELECT: &str = r#"
    SELECT f.product_id, p.name, p.slug, p.price_cents, p.image_url, p.stock,
           f.created_at AS added_at
    FROM favorites f
    JOIN products p ON p.id = f.product_id
"#;

#[derive(Deserialize, Serialize, Debug)]
pub struct AddFavorite {
    pub product_id: String,
}

/// One entry of a bulk import: a bare product id, or an id with the time the
/// visitor favorited it
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum BulkFavoriteItem {
    Id(String),
    Entry {
        product_id: String,
        added_at: Option<DateTime<Utc>>,
    },
}

impl BulkFavoriteItem {
    pub fn product_id(&self) -> &str {
        match self {
            BulkFavoriteItem::Id(id) => id,
            BulkFavoriteItem::Entry { product_id, .. } => product_id,
        }
    }

    pub fn added_at(&self) -> Option<NaiveDateTime> {
        match self {
            BulkFavoriteItem::Id(_) => None,
            BulkFavoriteItem::Entry { added_at, .. } => added_at.map(|t| t.naive_utc()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct BulkFavoritesRequest {
    pub items: Vec<BulkFavoriteItem>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BulkFavoritesResponse {
    pub favorites: Vec<Favorite>,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub unknown_product_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RemoveFavoriteResponse {
    pub product_id: String,
    pub removed: bool,
}
