// src/products/handlers/public.rs

use axum::{
    extract::{Extension, Path},
    response::Json,
};
use tracing::debug;

use crate::common::{ApiError, AppQuery, Paginated, SharedState};
use crate::products::models::*;
use crate::products::services::ProductsService;

/// GET /api/products - Filtered, sorted and paginated catalog
pub async fn list_products(
    Extension(state_lock): Extension<SharedState>,
    AppQuery(params): AppQuery<ProductQueryParams>,
) -> Result<Json<Paginated<Product>>, ApiError> {
    let state = state_lock.read().await.clone();
    let page = ProductsService::new(state.db).list_products(&params).await?;
    Ok(Json(page))
}

/// GET /api/products/:slug - Product detail
pub async fn get_product(
    Extension(state_lock): Extension<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let state = state_lock.read().await.clone();
    let product = ProductsService::new(state.db).get_by_slug(&slug).await?;

    debug!(product_id = %product.id, slug = %slug, "Loaded product details");
    Ok(Json(product))
}

/// GET /api/products/best-selling
pub async fn best_selling(
    Extension(state_lock): Extension<SharedState>,
    AppQuery(params): AppQuery<BestSellingParams>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let state = state_lock.read().await.clone();
    let products = ProductsService::new(state.db)
        .best_selling(params.limit.unwrap_or(8))
        .await?;
    Ok(Json(products))
}

/// GET /api/categories
pub async fn list_categories(
    Extension(state_lock): Extension<SharedState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let state = state_lock.read().await.clone();
    let categories = ProductsService::new(state.db).categories().await?;
    Ok(Json(categories))
}
