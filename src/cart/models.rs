// src/cart/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Largest quantity a single cart line may hold
pub const MAX_LINE_QUANTITY: i64 = 99;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub slug: String,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub stock: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub items: Vec<CartLine>,
    /// Sum of quantities across lines
    pub item_count: i64,
    pub subtotal_cents: i64,
}

impl Cart {
    pub fn from_lines(items: Vec<CartLine>) -> Self {
        let item_count = items.iter().map(|l| l.quantity).sum();
        let subtotal_cents = items.iter().map(|l| l.line_total_cents).sum();
        Self {
            items,
            item_count,
            subtotal_cents,
        }
    }

    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AddToCart {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UpdateCartItem {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Deserialize, Debug, Default)]
pub struct RemoveFromCartParams {
    pub product_id: Option<String>,
}
