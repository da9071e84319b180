// src/cart/services.rs

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::models::*;
use super::validators::{AddToCartValidator, UpdateCartValidator};
use crate::common::{ApiError, Validator};

const CART_SELECT: &str = r#"
    SELECT ci.product_id, p.name, p.slug, p.price_cents, p.image_url, p.stock,
           ci.quantity, ci.quantity * p.price_cents AS line_total_cents, ci.updated_at
    FROM cart_items ci
    JOIN products p ON p.id = ci.product_id
    WHERE ci.user_id = ?
    ORDER BY ci.updated_at DESC, ci.product_id ASC
"#;

pub struct CartService {
    db: SqlitePool,
}

impl CartService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get_cart(&self, user_id: &str) -> Result<Cart, ApiError> {
        let mut conn = self.db.acquire().await?;
        fetch_cart(&mut conn, user_id).await
    }

    /// Insert a line or add to the quantity already there
    pub async fn add_item(&self, user_id: &str, request: &AddToCart) -> Result<Cart, ApiError> {
        AddToCartValidator.validate(request).into_result()?;

        let mut tx = self.db.begin().await?;
        ensure_active_product(&mut tx, &request.product_id).await?;

        let quantity: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO cart_items (user_id, product_id, quantity, updated_at)
            VALUES (?, ?, ?, datetime('now'))
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                quantity = cart_items.quantity + excluded.quantity,
                updated_at = datetime('now')
            RETURNING quantity
            "#,
        )
        .bind(user_id)
        .bind(&request.product_id)
        .bind(request.quantity)
        .fetch_one(&mut *tx)
        .await?;

        if quantity > MAX_LINE_QUANTITY {
            // Dropping tx rolls the increment back
            warn!(
                user_id = %user_id,
                product_id = %request.product_id,
                requested = quantity,
                "Cart line would exceed the per-line limit"
            );
            return Err(ApiError::ValidationError(format!(
                "quantity: a cart line can hold at most {} units",
                MAX_LINE_QUANTITY
            )));
        }

        let cart = fetch_cart(&mut tx, user_id).await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            product_id = %request.product_id,
            quantity,
            "Cart line upserted"
        );
        Ok(cart)
    }

    /// Set the exact quantity of a line; zero removes it
    pub async fn update_item(
        &self,
        user_id: &str,
        request: &UpdateCartItem,
    ) -> Result<Cart, ApiError> {
        UpdateCartValidator.validate(request).into_result()?;

        let mut tx = self.db.begin().await?;

        if request.quantity == 0 {
            remove_line(&mut tx, user_id, &request.product_id).await?;
        } else {
            ensure_active_product(&mut tx, &request.product_id).await?;
            sqlx::query(
                r#"
                INSERT INTO cart_items (user_id, product_id, quantity, updated_at)
                VALUES (?, ?, ?, datetime('now'))
                ON CONFLICT (user_id, product_id) DO UPDATE SET
                    quantity = excluded.quantity,
                    updated_at = datetime('now')
                "#,
            )
            .bind(user_id)
            .bind(&request.product_id)
            .bind(request.quantity)
            .execute(&mut *tx)
            .await?;
        }

        let cart = fetch_cart(&mut tx, user_id).await?;
        tx.commit().await?;

        debug!(
            user_id = %user_id,
            product_id = %request.product_id,
            quantity = request.quantity,
            "Cart line set"
        );
        Ok(cart)
    }

    /// Remove one line, or every line when `product_id` is `None`
    pub async fn remove(&self, user_id: &str, product_id: Option<&str>) -> Result<Cart, ApiError> {
        let mut conn = self.db.acquire().await?;

        match product_id {
            Some(product_id) => {
                remove_line(&mut conn, user_id, product_id).await?;
            }
            None => {
                let cleared = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
                    .bind(user_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();
                info!(user_id = %user_id, lines = cleared, "Cart cleared");
            }
        }

        fetch_cart(&mut conn, user_id).await
    }
}

async fn remove_line(
    conn: &mut SqliteConnection,
    user_id: &str,
    product_id: &str,
) -> Result<(), ApiError> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = ? AND product_id = ?")
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn ensure_active_product(
    conn: &mut SqliteConnection,
    product_id: &str,
) -> Result<(), ApiError> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM products WHERE id = ? AND is_active = 1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

    found
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", product_id)))
}

async fn fetch_cart(conn: &mut SqliteConnection, user_id: &str) -> Result<Cart, ApiError> {
    let lines = sqlx::query_as::<_, CartLine>(CART_SELECT)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(Cart::from_lines(lines))
}
