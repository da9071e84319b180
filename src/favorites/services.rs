// src/favorites/services.rs

use chrono::NaiveDateTime;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::models::*;
use crate::common::id_generator::parse_product_number;
use crate::common::{is_unique_violation, ApiError};

pub struct FavoritesService {
    db: SqlitePool,
}

impl FavoritesService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Most recently added first
    pub async fn list(&self, user_id: &str) -> Result<Vec<Favorite>, ApiError> {
        let mut conn = self.db.acquire().await?;
        fetch_favorites(&mut conn, user_id).await
    }

    /// Add one favorite. A repeat add is reported as a conflict so callers can
    /// tell "already there" from a failure.
    pub async fn add(&self, user_id: &str, product_id: &str) -> Result<Favorite, ApiError> {
        ensure_product_id(product_id)?;

        let mut conn = self.db.acquire().await?;
        if !product_exists(&mut conn, product_id).await? {
            return Err(ApiError::NotFound(format!("Product not found: {}", product_id)));
        }

        sqlx::query(
            "INSERT INTO favorites (user_id, product_id, created_at) VALUES (?, ?, datetime('now'))",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Favorite already exists".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        info!(user_id = %user_id, product_id = %product_id, "Favorite added");

        let favorite = sqlx::query_as::<_, Favorite>(&format!(
            "{} WHERE f.user_id = ? AND f.product_id = ?",
            FAVORITE_SELECT
        ))
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(favorite)
    }

    /// Remove a favorite; removing one that is not there is not an error
    pub async fn remove(&self, user_id: &str, product_id: &str) -> Result<bool, ApiError> {
        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND product_id = ?")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.db)
            .await?
            .rows_affected()
            > 0;

        debug!(user_id = %user_id, product_id = %product_id, removed, "Favorite removal");
        Ok(removed)
    }

    /// Merge a batch of favorites into the stored set inside one transaction.
    ///
    /// The result is the union keyed by product id. When both sides know a
    /// product, the later `added_at` wins. Unknown or malformed product ids
    /// are skipped and reported.
    pub async fn bulk_merge(
        &self,
        user_id: &str,
        request: &BulkFavoritesRequest,
    ) -> Result<BulkFavoritesResponse, ApiError> {
        if request.items.len() > MAX_BULK_FAVORITES {
            return Err(ApiError::ValidationError(format!(
                "items: at most {} favorites per import",
                MAX_BULK_FAVORITES
            )));
        }
        let incoming = collapse_items(&request.items);

        let mut inserted = 0;
        let mut updated = 0;
        let mut unknown_product_ids = Vec::new();

        let mut tx = self.db.begin().await?;

        for (product_id, added_at) in &incoming {
            if parse_product_number(product_id).is_none()
                || !product_exists(&mut tx, product_id).await?
            {
                unknown_product_ids.push(product_id.clone());
                continue;
            }

            let stored: Option<String> = sqlx::query_scalar(
                "SELECT created_at FROM favorites WHERE user_id = ? AND product_id = ?",
            )
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let added_at = added_at.map(|t| t.format(TIMESTAMP_FORMAT).to_string());

            match stored {
                None => {
                    let rows = sqlx::query(
                        r#"
                        INSERT INTO favorites (user_id, product_id, created_at)
                        VALUES (?, ?, COALESCE(?, datetime('now')))
                        ON CONFLICT (user_id, product_id) DO NOTHING
                        "#,
                    )
                    .bind(user_id)
                    .bind(product_id)
                    .bind(&added_at)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                    inserted += rows as usize;
                }
                Some(stored) => {
                    let Some(added_at) = added_at else { continue };
                    if is_later(&added_at, &stored) {
                        sqlx::query(
                            "UPDATE favorites SET created_at = ? WHERE user_id = ? AND product_id = ?",
                        )
                        .bind(&added_at)
                        .bind(user_id)
                        .bind(product_id)
                        .execute(&mut *tx)
                        .await?;
                        updated += 1;
                    }
                }
            }
        }

        let favorites = fetch_favorites(&mut tx, user_id).await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            received = request.items.len(),
            inserted,
            updated,
            skipped = unknown_product_ids.len(),
            "Favorites merged"
        );

        Ok(BulkFavoritesResponse {
            favorites,
            inserted,
            updated,
            skipped: unknown_product_ids.len(),
            unknown_product_ids,
        })
    }
}

/// Deduplicate by product id, keeping the latest timestamp seen for each
fn collapse_items(items: &[BulkFavoriteItem]) -> BTreeMap<String, Option<NaiveDateTime>> {
    let mut collapsed: BTreeMap<String, Option<NaiveDateTime>> = BTreeMap::new();
    for item in items {
        let entry = collapsed.entry(item.product_id().to_string()).or_insert(None);
        *entry = (*entry).max(item.added_at());
    }
    collapsed
}

fn is_later(candidate: &str, stored: &str) -> bool {
    match (
        NaiveDateTime::parse_from_str(candidate, TIMESTAMP_FORMAT),
        NaiveDateTime::parse_from_str(stored, TIMESTAMP_FORMAT),
    ) {
        (Ok(candidate), Ok(stored)) => candidate > stored,
        _ => candidate > stored,
    }
}

fn ensure_product_id(product_id: &str) -> Result<(), ApiError> {
    if parse_product_number(product_id).is_none() {
        return Err(ApiError::ValidationError(format!(
            "product_id: invalid product id '{}'",
            product_id
        )));
    }
    Ok(())
}

async fn product_exists(conn: &mut SqliteConnection, product_id: &str) -> Result<bool, ApiError> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

async fn fetch_favorites(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<Favorite>, ApiError> {
    let favorites = sqlx::query_as::<_, Favorite>(&format!(
        "{} WHERE f.user_id = ? ORDER BY f.created_at DESC, f.product_id ASC",
        FAVORITE_SELECT
    ))
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(favorites)
}
