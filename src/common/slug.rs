// src/common/slug.rs
//! URL slugs derived from display names

use regex::Regex;
use sqlx::SqliteConnection;
use std::collections::HashSet;
use std::sync::OnceLock;

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static slug pattern"))
}

/// Tables that carry a unique `slug` column
#[derive(Debug, Clone, Copy)]
pub enum SlugScope {
    Products,
    Blogs,
}

impl SlugScope {
    fn table(&self) -> &'static str {
        match self {
            SlugScope::Products => "products",
            SlugScope::Blogs => "blogs",
        }
    }
}

/// Lowercase, collapse every run of non-alphanumerics into a single `-`, and
/// trim dashes at both ends. Falls back to `item` for names with no usable
/// characters.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let slug = non_alphanumeric().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "item".to_string()
    } else {
        slug.to_string()
    }
}

/// First free slug among `base`, `base-1`, `base-2`, ...
pub fn disambiguate(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Allocate a unique slug for `name` in the given table. `exclude_id` keeps a
/// row's own slug from counting as taken when it is renamed.
///
/// Must run on the same connection (usually a transaction) as the insert
/// that uses the slug.
pub async fn unique_slug(
    conn: &mut SqliteConnection,
    scope: SlugScope,
    name: &str,
    exclude_id: Option<&str>,
) -> Result<String, sqlx::Error> {
    let base = slugify(name);
    let sql = format!(
        "SELECT slug FROM {} WHERE (slug = ? OR slug LIKE ? || '-%') AND id != ?",
        scope.table()
    );

    let taken: HashSet<String> = sqlx::query_scalar::<_, String>(&sql)
        .bind(&base)
        .bind(&base)
        .bind(exclude_id.unwrap_or(""))
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();

    Ok(disambiguate(&base, &taken))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sourdough Bread"), "sourdough-bread");
        assert_eq!(slugify("  Pain au Chocolat!! "), "pain-au-chocolat");
        assert_eq!(slugify("Rye & Caraway -- Loaf"), "rye-caraway-loaf");
        assert_eq!(slugify("???"), "item");
    }

    #[test]
    fn test_disambiguate() {
        let mut taken = HashSet::new();
        assert_eq!(disambiguate("sourdough-bread", &taken), "sourdough-bread");

        taken.insert("sourdough-bread".to_string());
        assert_eq!(disambiguate("sourdough-bread", &taken), "sourdough-bread-1");

        taken.insert("sourdough-bread-1".to_string());
        assert_eq!(disambiguate("sourdough-bread", &taken), "sourdough-bread-2");
    }
}
