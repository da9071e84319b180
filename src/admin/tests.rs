use axum::http::{Method, StatusCode};

use crate::auth::Role;
use crate::common::test_support::{create_user, insert_product, send, test_app, token_for};

#[tokio::test]
async fn test_dashboard_metrics_counts() {
    let (app, pool) = test_app().await;
    let admin = create_user(&pool, "owner@bakery.test", Role::Admin).await;
    let user = create_user(&pool, "shopper@example.com", Role::User).await;
    insert_product(&pool, "oaw-001", "Baguette", 350).await;
    insert_product(&pool, "oaw-002", "Brioche", 800).await;
    sqlx::query("UPDATE products SET stock = 2 WHERE id = 'oaw-002'")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO cart_items (user_id, product_id, quantity) VALUES (?, 'oaw-001', 3)")
        .bind(&user)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO favorites (user_id, product_id) VALUES (?, 'oaw-002')")
        .bind(&user)
        .execute(&pool)
        .await
        .unwrap();

    let token = token_for(&admin, Role::Admin);
    let (status, metrics) =
        send(&app, Method::GET, "/api/admin/dashboard/metrics", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["total_users"], 2);
    assert_eq!(metrics["admin_users"], 1);
    assert_eq!(metrics["total_products"], 2);
    assert_eq!(metrics["low_stock_products"], 1);
    assert_eq!(metrics["total_favorites"], 1);
    assert_eq!(metrics["cart_lines"], 1);
    assert_eq!(metrics["cart_units"], 3);
    assert_eq!(metrics["total_blogs"], 0);
}

#[tokio::test]
async fn test_dashboard_metrics_require_admin() {
    let (app, pool) = test_app().await;
    let user = create_user(&pool, "shopper@example.com", Role::User).await;

    let (status, _) = send(&app, Method::GET, "/api/admin/dashboard/metrics", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = token_for(&user, Role::User);
    let (status, body) =
        send(&app, Method::GET, "/api/admin/dashboard/metrics", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}
