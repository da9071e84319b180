use axum::http::{Method, StatusCode};
use serde_json::json;

use super::models::*;
use super::services::BlogsService;
use crate::auth::{AuthedUser, Role};
use crate::common::test_support::{create_user, migrated_pool, send, test_app, token_for};
use crate::common::ApiError;

fn author(id: &str, role: Role) -> AuthedUser {
    AuthedUser {
        id: id.to_string(),
        email: "author@example.com".to_string(),
        role,
    }
}

fn post(title: &str, category: Option<&str>) -> CreateBlog {
    CreateBlog {
        title: title.to_string(),
        excerpt: Some(format!("About {}", title.to_lowercase())),
        content: format!("All about {}.", title),
        category: category.map(str::to_string),
    }
}

#[test]
fn test_blog_sort_names() {
    assert_eq!("popular".parse::<BlogSort>().unwrap(), BlogSort::Popular);
    assert_eq!("title".parse::<BlogSort>().unwrap(), BlogSort::Title);
    assert!("hottest".parse::<BlogSort>().is_err());
}

#[tokio::test]
async fn test_create_blog_generates_unique_slugs() {
    let pool = migrated_pool().await;
    let admin = create_user(&pool, "owner@bakery.test", Role::Admin).await;
    let service = BlogsService::new(pool);

    let first = service
        .create_blog(&author(&admin, Role::Admin), post("Laminating Dough", Some("pastries")))
        .await
        .unwrap();
    let second = service
        .create_blog(&author(&admin, Role::Admin), post("Laminating Dough", None))
        .await
        .unwrap();

    assert_eq!(first.slug, "laminating-dough");
    assert_eq!(second.slug, "laminating-dough-1");
    assert!(first.id.starts_with("B_"));
    assert_eq!(first.category_slug.as_deref(), Some("pastries"));
    assert_eq!(first.author_role, "admin");
    assert_eq!(first.view_count, 0);
}

#[tokio::test]
async fn test_create_blog_validates_input() {
    let pool = migrated_pool().await;
    let admin = create_user(&pool, "owner@bakery.test", Role::Admin).await;
    let service = BlogsService::new(pool);

    let mut empty = post("  ", None);
    empty.content = String::new();
    assert!(matches!(
        service.create_blog(&author(&admin, Role::Admin), empty).await,
        Err(ApiError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_viewing_counts_views() {
    let pool = migrated_pool().await;
    let admin = create_user(&pool, "owner@bakery.test", Role::Admin).await;
    let service = BlogsService::new(pool);
    let blog = service
        .create_blog(&author(&admin, Role::Admin), post("Starter Care", None))
        .await
        .unwrap();

    service.view_by_slug(&blog.slug).await.unwrap();
    let viewed = service.view_by_slug(&blog.slug).await.unwrap();
    assert_eq!(viewed.view_count, 2);

    assert!(matches!(
        service.view_by_slug("missing-post").await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_filters_and_sorts() {
    let pool = migrated_pool().await;
    let admin = create_user(&pool, "owner@bakery.test", Role::Admin).await;
    let guest_writer = create_user(&pool, "writer@example.com", Role::User).await;
    let service = BlogsService::new(pool);

    let sourdough = service
        .create_blog(&author(&admin, Role::Admin), post("Sourdough Basics", Some("breads")))
        .await
        .unwrap();
    service
        .create_blog(&author(&admin, Role::Admin), post("Croissant Secrets", Some("pastries")))
        .await
        .unwrap();
    service
        .create_blog(&author(&guest_writer, Role::User), post("A Customer Story", None))
        .await
        .unwrap();

    let all = service.list_blogs(&BlogQueryParams::default()).await.unwrap();
    assert_eq!(all.total, 3);

    let breads = service
        .list_blogs(&BlogQueryParams {
            category: Some("breads".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(breads.total, 1);
    assert_eq!(breads.items[0].id, sourdough.id);

    let by_admins = service
        .list_blogs(&BlogQueryParams {
            author_role: Some("admin".to_string()),
            sort: Some("title".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let titles: Vec<&str> = by_admins.items.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Croissant Secrets", "Sourdough Basics"]);

    let searched = service
        .list_blogs(&BlogQueryParams {
            search: Some("customer".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.total, 1);

    service.view_by_slug(&sourdough.slug).await.unwrap();
    let popular = service
        .list_blogs(&BlogQueryParams {
            sort: Some("popular".to_string()),
            limit: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(popular.items[0].id, sourdough.id);
    assert_eq!(popular.total_pages, 3);

    assert!(matches!(
        service
            .list_blogs(&BlogQueryParams {
                author_role: Some("superuser".to_string()),
                ..Default::default()
            })
            .await,
        Err(ApiError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_blog_routes() {
    let (app, pool) = test_app().await;
    let admin = create_user(&pool, "owner@bakery.test", Role::Admin).await;
    let user = create_user(&pool, "reader@example.com", Role::User).await;
    let body = json!({ "title": "Holiday Menu", "content": "Stollen is back." });

    let (status, _) = send(&app, Method::POST, "/api/blogs", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user_token = token_for(&user, Role::User);
    let (status, _) =
        send(&app, Method::POST, "/api/blogs", Some(&user_token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin_token = token_for(&admin, Role::Admin);
    let (status, created) =
        send(&app, Method::POST, "/api/blogs", Some(&admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["slug"], "holiday-menu");

    let (status, list) = send(&app, Method::GET, "/api/blogs?sort=newest", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);

    let (status, detail) = send(&app, Method::GET, "/api/blogs/holiday-menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["view_count"], 1);

    let (status, _) = send(&app, Method::GET, "/api/blogs?sort=random", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
