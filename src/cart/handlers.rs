// src/cart/handlers.rs

use axum::{
    extract::Extension,
    Json,
};

use super::models::*;
use super::services::CartService;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppJson, AppQuery, SharedState};

/// GET /api/cart
pub async fn get_cart(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<Json<Cart>, ApiError> {
    let state = state_lock.read().await.clone();
    let cart = CartService::new(state.db).get_cart(&authed.id).await?;
    Ok(Json(cart))
}

/// POST /api/cart - add to an existing line or create it
pub async fn add_to_cart(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    AppJson(payload): AppJson<AddToCart>,
) -> Result<Json<Cart>, ApiError> {
    let state = state_lock.read().await.clone();
    let cart = CartService::new(state.db)
        .add_item(&authed.id, &payload)
        .await?;
    Ok(Json(cart))
}

/// PUT /api/cart - set an exact quantity
pub async fn update_cart_item(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    AppJson(payload): AppJson<UpdateCartItem>,
) -> Result<Json<Cart>, ApiError> {
    let state = state_lock.read().await.clone();
    let cart = CartService::new(state.db)
        .update_item(&authed.id, &payload)
        .await?;
    Ok(Json(cart))
}

/// DELETE /api/cart?product_id=oaw-001, or the whole cart without a product
pub async fn remove_from_cart(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    AppQuery(params): AppQuery<RemoveFromCartParams>,
) -> Result<Json<Cart>, ApiError> {
    let state = state_lock.read().await.clone();
    let cart = CartService::new(state.db)
        .remove(&authed.id, params.product_id.as_deref())
        .await?;
    Ok(Json(cart))
}
