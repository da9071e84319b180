// src/products/handlers/admin.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::auth::AdminUser;
use crate::common::{ApiError, AppJson, SharedState};
use crate::products::models::*;
use crate::products::services::ProductsService;

/// POST /api/admin/products - Create a new product
pub async fn admin_create_product(
    Extension(state_lock): Extension<SharedState>,
    AdminUser(admin): AdminUser,
    AppJson(body): AppJson<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let state = state_lock.read().await.clone();

    info!(admin_user_id = %admin.id, name = %body.name, "Creating product");
    let product = ProductsService::new(state.db).create_product(body).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/admin/products/:id - Fetch a product, including inactive ones
pub async fn admin_get_product(
    Extension(state_lock): Extension<SharedState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let state = state_lock.read().await.clone();
    let product = ProductsService::new(state.db).get_by_id(&id).await?;
    Ok(Json(product))
}

/// PUT /api/admin/products/:id - Update a product
pub async fn admin_update_product(
    Extension(state_lock): Extension<SharedState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateProduct>,
) -> Result<Json<Product>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(admin_user_id = %admin.id, product_id = %id, "Updating product");
    let product = ProductsService::new(state.db).update_product(&id, body).await?;

    Ok(Json(product))
}

/// DELETE /api/admin/products/:id - Delete a product
pub async fn admin_delete_product(
    Extension(state_lock): Extension<SharedState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let state = state_lock.read().await.clone();

    info!(admin_user_id = %admin.id, product_id = %id, "Deleting product");
    ProductsService::new(state.db).delete_product(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/products/bulk-delete
pub async fn bulk_delete_products(
    Extension(state_lock): Extension<SharedState>,
    AdminUser(admin): AdminUser,
    AppJson(request): AppJson<BulkProductDelete>,
) -> Result<Json<BulkDeleteResult>, ApiError> {
    let state = state_lock.read().await.clone();

    info!(
        admin_user_id = %admin.id,
        product_count = request.ids.len(),
        "Starting bulk product deletion"
    );
    let result = ProductsService::new(state.db).bulk_delete(&request).await?;

    Ok(Json(result))
}
