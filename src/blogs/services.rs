// src/blogs/services.rs

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::models::*;
use super::validators::BlogValidator;
use crate::auth::{AuthedUser, Role};
use crate::common::filters::{like_pattern, FilterValue, SqlFilter};
use crate::common::id_generator::generate_blog_id;
use crate::common::slug::{unique_slug, SlugScope};
use crate::common::{is_unique_violation, ApiError, Paginated, Pagination, Validator};
use crate::products::services::resolve_category;

pub struct BlogsService {
    db: SqlitePool,
}

impl BlogsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_blogs(&self, params: &BlogQueryParams) -> Result<Paginated<Blog>, ApiError> {
        let sort: BlogSort = match params.sort.as_deref() {
            Some(s) => s.parse().map_err(ApiError::BadRequest)?,
            None => BlogSort::default(),
        };
        let pagination = Pagination::new(params.page, params.limit);

        let mut filter = SqlFilter::new();
        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = like_pattern(search);
            filter.push(
                r"(b.title LIKE ? ESCAPE '\' OR b.excerpt LIKE ? ESCAPE '\' OR b.content LIKE ? ESCAPE '\')",
                [
                    FilterValue::Text(pattern.clone()),
                    FilterValue::Text(pattern.clone()),
                    FilterValue::Text(pattern),
                ],
            );
        }
        if let Some(category) = params.category.as_deref().filter(|c| !c.is_empty()) {
            filter.push("c.slug = ?", [FilterValue::Text(category.to_string())]);
        }
        if let Some(author_role) = params.author_role.as_deref().filter(|r| !r.is_empty()) {
            let role: Role = author_role.parse().map_err(ApiError::BadRequest)?;
            filter.push("r.name = ?", [FilterValue::Text(role.as_str().to_string())]);
        }

        let where_sql = filter.where_sql();

        let count_sql = format!("SELECT COUNT(*) {}{}", BLOG_FROM, where_sql);
        let total: i64 = filter
            .bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql))
            .fetch_one(&self.db)
            .await?;

        let list_sql = format!(
            "{}{} ORDER BY {} LIMIT ? OFFSET ?",
            BLOG_SELECT,
            where_sql,
            sort.order_by()
        );
        let blogs = filter
            .bind_query_as(sqlx::query_as::<_, Blog>(&list_sql))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(&self.db)
            .await?;

        debug!(
            blog_count = blogs.len(),
            total = total,
            page = pagination.page,
            sort = ?sort,
            "Loaded paginated blog list"
        );

        Ok(Paginated::new(blogs, total, pagination))
    }

    /// Blog by slug; every read counts as a view
    pub async fn view_by_slug(&self, slug: &str) -> Result<Blog, ApiError> {
        let mut tx = self.db.begin().await?;

        let id: Option<String> = sqlx::query_scalar("SELECT id FROM blogs WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await?;
        let id = id.ok_or_else(|| ApiError::NotFound(format!("Blog not found: {}", slug)))?;

        sqlx::query(
            r#"
            INSERT INTO blog_stats (blog_id, view_count) VALUES (?, 1)
            ON CONFLICT (blog_id) DO UPDATE SET view_count = blog_stats.view_count + 1
            "#,
        )
        .bind(&id)
        .execute(&mut *tx)
        .await?;

        let blog = fetch_blog(&mut tx, &id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Blog not found: {}", slug)))?;
        tx.commit().await?;

        Ok(blog)
    }

    pub async fn create_blog(
        &self,
        author: &AuthedUser,
        request: CreateBlog,
    ) -> Result<Blog, ApiError> {
        BlogValidator.validate(&request).into_result()?;

        let mut tx = self.db.begin().await?;

        let category_id = resolve_category(&mut tx, request.category.as_deref()).await?;
        let slug = unique_slug(&mut tx, SlugScope::Blogs, &request.title, None).await?;
        let id = generate_blog_id();

        sqlx::query(
            r#"
            INSERT INTO blogs (id, title, slug, excerpt, content, author_id, category_id, published_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, datetime('now'))
            "#,
        )
        .bind(&id)
        .bind(request.title.trim())
        .bind(&slug)
        .bind(request.excerpt.as_deref().map(str::trim))
        .bind(&request.content)
        .bind(&author.id)
        .bind(category_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Blog slug already taken, retry".to_string())
            } else {
                ApiError::DatabaseError(e)
            }
        })?;

        sqlx::query("INSERT INTO blog_stats (blog_id, view_count) VALUES (?, 0)")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        let blog = fetch_blog(&mut tx, &id)
            .await?
            .ok_or_else(|| ApiError::InternalServer("blog missing after insert".to_string()))?;
        tx.commit().await?;

        info!(blog_id = %blog.id, slug = %blog.slug, author_id = %author.id, "Blog published");
        Ok(blog)
    }
}

async fn fetch_blog(conn: &mut SqliteConnection, id: &str) -> Result<Option<Blog>, ApiError> {
    let blog = sqlx::query_as::<_, Blog>(&format!("{} WHERE b.id = ?", BLOG_SELECT))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(blog)
}
