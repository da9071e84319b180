// src/blogs/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use super::models::*;
use super::services::BlogsService;
use crate::auth::AdminUser;
use crate::common::{ApiError, AppJson, AppQuery, Paginated, SharedState};

/// GET /api/blogs - Filtered, sorted and paginated posts
pub async fn list_blogs(
    Extension(state_lock): Extension<SharedState>,
    AppQuery(params): AppQuery<BlogQueryParams>,
) -> Result<Json<Paginated<Blog>>, ApiError> {
    let state = state_lock.read().await.clone();
    let page = BlogsService::new(state.db).list_blogs(&params).await?;
    Ok(Json(page))
}

/// GET /api/blogs/:slug
pub async fn get_blog(
    Extension(state_lock): Extension<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Blog>, ApiError> {
    let state = state_lock.read().await.clone();
    let blog = BlogsService::new(state.db).view_by_slug(&slug).await?;
    Ok(Json(blog))
}

/// POST /api/blogs - admin only
pub async fn create_blog(
    Extension(state_lock): Extension<SharedState>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<CreateBlog>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    let state = state_lock.read().await.clone();
    let blog = BlogsService::new(state.db)
        .create_blog(&admin, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(blog)))
}
