// src/blogs/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub author_id: String,
    pub author_name: Option<String>,
    pub author_role: String,
    pub category_slug: Option<String>,
    pub category_name: Option<String>,
    pub published_at: String,
    pub view_count: i64,
}

/// Columns selected for every `Blog` query; alias `b` is `blogs`
pub const BLOG_SELECT: &str = r#"
    SELECT
        b.id, b.title, b.slug, b.excerpt, b.content, b.author_id,
        u.name AS author_name, r.name AS author_role,
        c.slug AS category_slug, c.name AS category_name,
        b.published_at, COALESCE(s.view_count, 0) AS view_count
    FROM blogs b
    JOIN users u ON u.id = b.author_id
    JOIN roles r ON r.id = u.role_id
    LEFT JOIN categories c ON c.id = b.category_id
    LEFT JOIN blog_stats s ON s.blog_id = b.id
"#;

/// Joins needed by listing predicates, without the column list
pub const BLOG_FROM: &str = r#"
    FROM blogs b
    JOIN users u ON u.id = b.author_id
    JOIN roles r ON r.id = u.role_id
    LEFT JOIN categories c ON c.id = b.category_id
    LEFT JOIN blog_stats s ON s.blog_id = b.id
"#;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct BlogQueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSort {
    #[default]
    Newest,
    Oldest,
    Popular,
    Title,
}

impl BlogSort {
    pub fn order_by(&self) -> &'static str {
        match self {
            BlogSort::Newest => "b.published_at DESC, b.id DESC",
            BlogSort::Oldest => "b.published_at ASC, b.id ASC",
            BlogSort::Popular => "COALESCE(s.view_count, 0) DESC, b.published_at DESC, b.id DESC",
            BlogSort::Title => "b.title COLLATE NOCASE ASC, b.id ASC",
        }
    }
}

impl FromStr for BlogSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(BlogSort::Newest),
            "oldest" => Ok(BlogSort::Oldest),
            "popular" => Ok(BlogSort::Popular),
            "title" => Ok(BlogSort::Title),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateBlog {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    /// Category slug
    pub category: Option<String>,
}
