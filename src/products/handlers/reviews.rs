// src/products/handlers/reviews.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};

use crate::auth::AuthedUser;
use crate::common::{ApiError, AppJson, SharedState};
use crate::products::models::{CreateReview, Review};
use crate::products::services::ProductsService;

/// GET /api/products/:slug/reviews
pub async fn list_reviews(
    Extension(state_lock): Extension<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let state = state_lock.read().await.clone();
    let reviews = ProductsService::new(state.db).list_reviews(&slug).await?;
    Ok(Json(reviews))
}

/// POST /api/products/:slug/reviews
pub async fn create_review(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
    Path(slug): Path<String>,
    AppJson(body): AppJson<CreateReview>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let state = state_lock.read().await.clone();
    let review = ProductsService::new(state.db)
        .create_review(&slug, &authed, body)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}
