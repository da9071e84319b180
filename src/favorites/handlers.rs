// src/favorites/handlers.rs
//! Wishlist handlers for signed-in users

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use super::models::*;
use super::services::FavoritesService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppJson, SharedState};

/// GET /api/favorites
pub async fn list_favorites(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<Json<Vec<Favorite>>, ApiError> {
    let state = state_lock.read().await.clone();
    let favorites = FavoritesService::new(state.db).list(&authed.id).await?;
    Ok(Json(favorites))
}

/// POST /api/favorites - 409 when the product is already a favorite
pub async fn add_favorite(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    AppJson(payload): AppJson<AddFavorite>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let state = state_lock.read().await.clone();
    let favorite = FavoritesService::new(state.db)
        .add(&authed.id, payload.product_id.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /api/favorites/:product_id
pub async fn remove_favorite(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(product_id): Path<String>,
) -> Result<Json<RemoveFavoriteResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let removed = FavoritesService::new(state.db)
        .remove(&authed.id, &product_id)
        .await?;
    Ok(Json(RemoveFavoriteResponse { product_id, removed }))
}

/// POST /api/favorites/bulk
/// Merges a guest wishlist into the account
///
/// # Request Body
/// ```json
/// { "items": ["oaw-001", { "product_id": "oaw-002", "added_at": "2024-05-01T10:00:00Z" }] }
/// ```
pub async fn bulk_merge_favorites(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    AppJson(payload): AppJson<BulkFavoritesRequest>,
) -> Result<Json<BulkFavoritesResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let response = FavoritesService::new(state.db)
        .bulk_merge(&authed.id, &payload)
        .await?;
    Ok(Json(response))
}
