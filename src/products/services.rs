// src/products/services.rs

use sqlx::{SqliteConnection, SqlitePool};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::models::*;
use super::validators::{BulkDeleteValidator, ProductValidator, ReviewValidator};
use crate::auth::AuthedUser;
use crate::common::filters::{like_pattern, FilterValue, SqlFilter};
use crate::common::id_generator::{format_product_id, generate_review_id, PRODUCT_ID_PREFIX};
use crate::common::slug::{unique_slug, SlugScope};
use crate::common::{is_unique_violation, ApiError, Paginated, Pagination, Validator};

pub struct ProductsService {
    db: SqlitePool,
}

impl ProductsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Catalog reads
    // ============================================================================

    /// Filtered, sorted, paginated listing of active products
    pub async fn list_products(
        &self,
        params: &ProductQueryParams,
    ) -> Result<Paginated<Product>, ApiError> {
        let sort: ProductSort = match params.sort.as_deref() {
            Some(s) => s.parse().map_err(ApiError::BadRequest)?,
            None => ProductSort::default(),
        };
        let pagination = Pagination::new(params.page, params.limit);

        let mut filter = SqlFilter::new();
        filter.push_clause("p.is_active = 1");

        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search);
            filter.push(
                r"(p.name LIKE ? ESCAPE '\' OR p.description LIKE ? ESCAPE '\')",
                [FilterValue::Text(pattern.clone()), FilterValue::Text(pattern)],
            );
        }
        if let Some(category) = params.category.as_deref().filter(|c| !c.is_empty()) {
            filter.push("c.slug = ?", [FilterValue::Text(category.to_string())]);
        }
        if let Some(min) = params.min_price {
            filter.push("p.price_cents >= ?", [FilterValue::Int(min)]);
        }
        if let Some(max) = params.max_price {
            filter.push("p.price_cents <= ?", [FilterValue::Int(max)]);
        }
        if params.in_stock == Some(true) {
            filter.push_clause("p.stock > 0");
        }

        let where_sql = filter.where_sql();

        let count_sql = format!(
            "SELECT COUNT(*) FROM products p LEFT JOIN categories c ON c.id = p.category_id{}",
            where_sql
        );
        let total: i64 = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql))
            .fetch_one(&self.db)
            .await?;

        let list_sql = format!(
            "{}{} ORDER BY {} LIMIT ? OFFSET ?",
            PRODUCT_SELECT,
            where_sql,
            sort.order_by()
        );
        let products = filter
            .bind_query_as(sqlx::query_as::<_, Product>(&list_sql))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.db)
            .await?;

        debug!(
            product_count = products.len(),
            total = total,
            page = pagination.page,
            limit = pagination.limit,
            sort = ?sort,
            "Loaded paginated product list"
        );

        Ok(Paginated::new(products, total, pagination))
    }

    /// Active product by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        sqlx::query_as::<_, Product>(&format!(
            "{} WHERE p.slug = ? AND p.is_active = 1",
            PRODUCT_SELECT
        ))
        .bind(slug)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", slug)))
    }

    /// Any product by id, active or not
    pub async fn get_by_id(&self, id: &str) -> Result<Product, ApiError> {
        fetch_product(&mut *self.db.acquire().await?, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))
    }

    /// Active products ranked by units sitting in carts, then review count
    pub async fn best_selling(&self, limit: i64) -> Result<Vec<Product>, ApiError> {
        let limit = limit.clamp(1, 50);
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"{}
            WHERE p.is_active = 1
            ORDER BY
                COALESCE((SELECT SUM(ci.quantity) FROM cart_items ci WHERE ci.product_id = p.id), 0)
                + (SELECT COUNT(*) FROM reviews rv WHERE rv.product_id = p.id) DESC,
                p.created_at DESC, p.id DESC
            LIMIT ?"#,
            PRODUCT_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.slug,
                   (SELECT COUNT(*) FROM products p
                    WHERE p.category_id = c.id AND p.is_active = 1) AS product_count
            FROM categories c
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    // ============================================================================
    // Admin writes
    // ============================================================================

    /// Create a product. Id allocation, slug allocation and the insert share
    /// one transaction.
    pub async fn create_product(&self, request: CreateProduct) -> Result<Product, ApiError> {
        ProductValidator.validate(&request).into_result()?;

        let mut tx = self.db.begin().await?;

        let category_id = resolve_category(&mut tx, request.category.as_deref()).await?;
        let id = next_product_id(&mut tx).await?;
        let slug = unique_slug(&mut tx, SlugScope::Products, &request.name, None).await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, slug, description, price_cents, stock, category_id, image_url, is_active,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'), datetime('now'))
            "#,
        )
        .bind(&id)
        .bind(request.name.trim())
        .bind(&slug)
        .bind(request.description.as_deref())
        .bind(request.price_cents)
        .bind(request.stock.unwrap_or(0))
        .bind(category_id)
        .bind(request.image_url.as_deref())
        .bind(request.is_active.unwrap_or(true))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Product id or slug already taken, retry".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        let product = fetch_product(&mut tx, &id)
            .await?
            .ok_or_else(|| ApiError::InternalServer("product missing after insert".to_string()))?;

        tx.commit().await?;

        info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    /// Partial update; a new name regenerates the slug
    pub async fn update_product(
        &self,
        id: &str,
        request: UpdateProduct,
    ) -> Result<Product, ApiError> {
        ProductValidator.validate(&request).into_result()?;

        let mut tx = self.db.begin().await?;

        let existing = fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", id)))?;

        let (name, slug) = match request.name.as_deref().map(str::trim) {
            Some(new_name) if new_name != existing.name => {
                let slug = unique_slug(&mut tx, SlugScope::Products, new_name, Some(id)).await?;
                (new_name.to_string(), slug)
            }
            _ => (existing.name.clone(), existing.slug.clone()),
        };

        let category_id = match request.category.as_deref() {
            Some(category) => resolve_category(&mut tx, Some(category)).await?,
            None => existing.category_id,
        };

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?, slug = ?, description = ?, price_cents = ?, stock = ?,
                category_id = ?, image_url = ?, is_active = ?, updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&slug)
        .bind(request.description.or(existing.description))
        .bind(request.price_cents.unwrap_or(existing.price_cents))
        .bind(request.stock.unwrap_or(existing.stock))
        .bind(category_id)
        .bind(request.image_url.or(existing.image_url))
        .bind(request.is_active.unwrap_or(existing.is_active))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let product = fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| ApiError::InternalServer("product missing after update".to_string()))?;

        tx.commit().await?;

        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("Product not found: {}", id)));
        }

        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Delete many products in one transaction. Favorites, cart lines and
    /// reviews of the deleted products go with them.
    pub async fn bulk_delete(
        &self,
        request: &BulkProductDelete,
    ) -> Result<BulkDeleteResult, ApiError> {
        BulkDeleteValidator.validate(request).into_result()?;

        let ids: BTreeSet<&str> = request.ids.iter().map(String::as_str).collect();
        let mut result = BulkDeleteResult::default();

        let mut tx = self.db.begin().await?;
        for id in ids {
            let deleted = sqlx::query("DELETE FROM products WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            if deleted > 0 {
                result.deleted.push(id.to_string());
            } else {
                result.not_found.push(id.to_string());
            }
        }
        tx.commit().await?;

        info!(
            deleted = result.deleted.len(),
            not_found = result.not_found.len(),
            "Bulk product deletion finished"
        );
        Ok(result)
    }

    // ============================================================================
    // Reviews
    // ============================================================================

    pub async fn list_reviews(&self, slug: &str) -> Result<Vec<Review>, ApiError> {
        let product = self.get_by_slug(slug).await?;

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT rv.id, rv.product_id, rv.user_id, u.name AS author_name,
                   rv.rating, rv.comment, rv.created_at
            FROM reviews rv
            JOIN users u ON u.id = rv.user_id
            WHERE rv.product_id = ?
            ORDER BY rv.created_at DESC, rv.id DESC
            "#,
        )
        .bind(&product.id)
        .fetch_all(&self.db)
        .await?;

        Ok(reviews)
    }

    /// One review per user and product; a second one is a conflict
    pub async fn create_review(
        &self,
        slug: &str,
        author: &AuthedUser,
        request: CreateReview,
    ) -> Result<Review, ApiError> {
        ReviewValidator.validate(&request).into_result()?;
        let product = self.get_by_slug(slug).await?;
        let id = generate_review_id();

        sqlx::query(
            r#"
            INSERT INTO reviews (id, product_id, user_id, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(&id)
        .bind(&product.id)
        .bind(&author.id)
        .bind(request.rating)
        .bind(request.comment.as_deref().map(str::trim))
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("You have already reviewed this product".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        info!(review_id = %id, product_id = %product.id, user_id = %author.id, "Review created");

        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT rv.id, rv.product_id, rv.user_id, u.name AS author_name,
                   rv.rating, rv.comment, rv.created_at
            FROM reviews rv JOIN users u ON u.id = rv.user_id
            WHERE rv.id = ?
            "#,
        )
        .bind(&id)
        .fetch_one(&self.db)
        .await?;

        Ok(review)
    }
}

async fn fetch_product(conn: &mut SqliteConnection, id: &str) -> Result<Option<Product>, ApiError> {
    let product = sqlx::query_as::<_, Product>(&format!("{} WHERE p.id = ?", PRODUCT_SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(product)
}

/// Next `oaw-###` id, one past the current maximum
async fn next_product_id(conn: &mut SqliteConnection) -> Result<String, ApiError> {
    let max: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(CAST(SUBSTR(id, ?) AS INTEGER)) FROM products WHERE id LIKE ? || '%'",
    )
    .bind(PRODUCT_ID_PREFIX.len() as i64 + 1)
    .bind(PRODUCT_ID_PREFIX)
    .fetch_one(&mut *conn)
    .await?;

    Ok(format_product_id(max.unwrap_or(0) + 1))
}

/// Category slug to id; an unknown slug is a validation error
pub(crate) async fn resolve_category(
    conn: &mut SqliteConnection,
    slug: Option<&str>,
) -> Result<Option<i64>, ApiError> {
    let Some(slug) = slug.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE slug = ?")
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?;

    id.map(Some)
        .ok_or_else(|| ApiError::ValidationError(format!("category: unknown category '{}'", slug)))
}
