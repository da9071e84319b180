use axum::http::{Method, StatusCode};
use serde_json::json;

use super::models::*;
use super::services::FavoritesService;
use crate::auth::Role;
use crate::common::test_support::{
    create_user, insert_product, migrated_pool, send, test_app, token_for,
};
use crate::common::ApiError;

fn entry(product_id: &str, added_at: &str) -> BulkFavoriteItem {
    BulkFavoriteItem::Entry {
        product_id: product_id.to_string(),
        added_at: Some(added_at.parse().unwrap()),
    }
}

#[test]
fn test_bulk_items_accept_ids_and_entries() {
    let request: BulkFavoritesRequest = serde_json::from_value(json!({
        "items": ["oaw-001", { "product_id": "oaw-002", "added_at": "2024-05-01T10:00:00Z" }]
    }))
    .unwrap();

    assert_eq!(request.items.len(), 2);
    assert_eq!(request.items[0].product_id(), "oaw-001");
    assert!(request.items[0].added_at().is_none());
    assert_eq!(request.items[1].product_id(), "oaw-002");
    assert_eq!(
        request.items[1].added_at().unwrap().format(TIMESTAMP_FORMAT).to_string(),
        "2024-05-01 10:00:00"
    );
}

#[tokio::test]
async fn test_adding_twice_keeps_one_entry() {
    let pool = migrated_pool().await;
    let user = create_user(&pool, "fan@example.com", Role::User).await;
    insert_product(&pool, "oaw-001", "Croissant", 300).await;
    let service = FavoritesService::new(pool);

    service.add(&user, "oaw-001").await.unwrap();
    let err = service.add(&user, "oaw-001").await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    assert_eq!(service.list(&user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_unknown_or_malformed_product() {
    let pool = migrated_pool().await;
    let user = create_user(&pool, "fan@example.com", Role::User).await;
    let service = FavoritesService::new(pool);

    assert!(matches!(
        service.add(&user, "oaw-123").await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        service.add(&user, "1 OR 1=1").await,
        Err(ApiError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let pool = migrated_pool().await;
    let user = create_user(&pool, "fan@example.com", Role::User).await;
    insert_product(&pool, "oaw-001", "Croissant", 300).await;
    let service = FavoritesService::new(pool);

    service.add(&user, "oaw-001").await.unwrap();
    assert!(service.remove(&user, "oaw-001").await.unwrap());
    assert!(!service.remove(&user, "oaw-001").await.unwrap());
    assert!(service.list(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_merge_is_a_union() {
    let pool = migrated_pool().await;
    let user = create_user(&pool, "fan@example.com", Role::User).await;
    for (id, name) in [("oaw-001", "Croissant"), ("oaw-002", "Eclair"), ("oaw-003", "Macaron")] {
        insert_product(&pool, id, name, 300).await;
    }
    let service = FavoritesService::new(pool);
    service.add(&user, "oaw-001").await.unwrap();
    service.add(&user, "oaw-002").await.unwrap();

    let request = BulkFavoritesRequest {
        items: vec![
            BulkFavoriteItem::Id("oaw-002".to_string()),
            BulkFavoriteItem::Id("oaw-003".to_string()),
            BulkFavoriteItem::Id("oaw-003".to_string()),
            BulkFavoriteItem::Id("oaw-999".to_string()),
        ],
    };
    let response = service.bulk_merge(&user, &request).await.unwrap();

    assert_eq!(response.inserted, 1);
    assert_eq!(response.updated, 0);
    assert_eq!(response.skipped, 1);
    assert_eq!(response.unknown_product_ids, vec!["oaw-999".to_string()]);

    let mut ids: Vec<String> = response.favorites.into_iter().map(|f| f.product_id).collect();
    ids.sort();
    assert_eq!(ids, vec!["oaw-001", "oaw-002", "oaw-003"]);

    // Same import again changes nothing
    let again = service.bulk_merge(&user, &request).await.unwrap();
    assert_eq!(again.inserted, 0);
    assert_eq!(again.favorites.len(), 3);
}

#[tokio::test]
async fn test_bulk_merge_later_timestamp_wins() {
    let pool = migrated_pool().await;
    let user = create_user(&pool, "fan@example.com", Role::User).await;
    insert_product(&pool, "oaw-001", "Croissant", 300).await;
    sqlx::query(
        "INSERT INTO favorites (user_id, product_id, created_at) VALUES (?, 'oaw-001', '2024-03-01 08:00:00')",
    )
    .bind(&user)
    .execute(&pool)
    .await
    .unwrap();
    let service = FavoritesService::new(pool);

    let older = BulkFavoritesRequest {
        items: vec![entry("oaw-001", "2024-01-01T00:00:00Z")],
    };
    let response = service.bulk_merge(&user, &older).await.unwrap();
    assert_eq!(response.updated, 0);
    assert_eq!(response.favorites[0].added_at, "2024-03-01 08:00:00");

    let newer = BulkFavoritesRequest {
        items: vec![
            entry("oaw-001", "2024-04-01T09:30:00Z"),
            entry("oaw-001", "2024-04-02T12:00:00Z"),
        ],
    };
    let response = service.bulk_merge(&user, &newer).await.unwrap();
    assert_eq!(response.updated, 1);
    assert_eq!(response.favorites.len(), 1);
    assert_eq!(response.favorites[0].added_at, "2024-04-02 12:00:00");
}

#[tokio::test]
async fn test_bulk_merge_skips_malformed_ids() {
    let pool = migrated_pool().await;
    let user = create_user(&pool, "fan@example.com", Role::User).await;
    insert_product(&pool, "oaw-001", "Croissant", 300).await;
    let service = FavoritesService::new(pool);

    let request = BulkFavoritesRequest {
        items: vec![
            BulkFavoriteItem::Id("oaw-001".to_string()),
            BulkFavoriteItem::Id("../etc".to_string()),
        ],
    };
    let response = service.bulk_merge(&user, &request).await.unwrap();
    assert_eq!(response.inserted, 1);
    assert_eq!(response.skipped, 1);
    assert_eq!(response.unknown_product_ids, vec!["../etc".to_string()]);
    assert_eq!(service.list(&user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let pool = migrated_pool().await;
    let alice = create_user(&pool, "alice@example.com", Role::User).await;
    let bob = create_user(&pool, "bob@example.com", Role::User).await;
    insert_product(&pool, "oaw-001", "Croissant", 300).await;
    let service = FavoritesService::new(pool);

    service.add(&alice, "oaw-001").await.unwrap();
    service.add(&bob, "oaw-001").await.unwrap();
    service.remove(&alice, "oaw-001").await.unwrap();

    assert!(service.list(&alice).await.unwrap().is_empty());
    assert_eq!(service.list(&bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_favorites_routes() {
    let (app, pool) = test_app().await;
    insert_product(&pool, "oaw-001", "Croissant", 300).await;
    let user = create_user(&pool, "fan@example.com", Role::User).await;
    let token = token_for(&user, Role::User);

    let (status, _) = send(&app, Method::GET, "/api/favorites", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = json!({ "product_id": "oaw-001" });
    let (status, created) =
        send(&app, Method::POST, "/api/favorites", Some(&token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Croissant");

    let (status, conflict) =
        send(&app, Method::POST, "/api/favorites", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "CONFLICT");

    let (status, merged) = send(
        &app,
        Method::POST,
        "/api/favorites/bulk",
        Some(&token),
        Some(json!({ "items": ["oaw-001", "oaw-404"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["inserted"], 0);
    assert_eq!(merged["skipped"], 1);
    assert_eq!(merged["favorites"].as_array().unwrap().len(), 1);

    let (status, removed) =
        send(&app, Method::DELETE, "/api/favorites/oaw-001", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["removed"], true);

    let (status, list) = send(&app, Method::GET, "/api/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}
