// src/common/filters.rs
//! WHERE-clause accumulation for listing queries
//!
//! Predicates are appended only for parameters that were supplied; the same
//! filter is bound into both the page query and its count query.

use sqlx::query::{QueryAs, QueryScalar};
use sqlx::sqlite::{Sqlite, SqliteArguments};

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
}

#[derive(Debug, Default)]
pub struct SqlFilter {
    clauses: Vec<String>,
    binds: Vec<FilterValue>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate with no bind parameters
    pub fn push_clause(&mut self, clause: &str) {
        self.clauses.push(clause.to_string());
    }

    /// Add a predicate whose `?` placeholders are filled from `values`, in order
    pub fn push(&mut self, clause: &str, values: impl IntoIterator<Item = FilterValue>) {
        self.clauses.push(clause.to_string());
        self.binds.extend(values);
    }

    /// `" WHERE a AND b"`, or an empty string when nothing was pushed
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn binds(&self) -> &[FilterValue] {
        &self.binds
    }

    pub fn bind_query_as<'q, O>(
        &self,
        mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        for value in &self.binds {
            query = match value {
                FilterValue::Text(s) => query.bind(s.clone()),
                FilterValue::Int(i) => query.bind(*i),
            };
        }
        query
    }

    pub fn bind_scalar<'q, O>(
        &self,
        mut query: QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
        for value in &self.binds {
            query = match value {
                FilterValue::Text(s) => query.bind(s.clone()),
                FilterValue::Int(i) => query.bind(*i),
            };
        }
        query
    }
}

/// `%term%` for LIKE with `%`, `_` and `\` escaped (pair with `ESCAPE '\'`)
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where() {
        let filter = SqlFilter::new();
        assert_eq!(filter.where_sql(), "");
        assert!(filter.binds().is_empty());
    }

    #[test]
    fn test_clauses_and_binds_accumulate_in_order() {
        let mut filter = SqlFilter::new();
        filter.push_clause("p.is_active = 1");
        filter.push(
            "(p.name LIKE ? ESCAPE '\\' OR p.description LIKE ? ESCAPE '\\')",
            [FilterValue::Text("%rye%".into()), FilterValue::Text("%rye%".into())],
        );
        filter.push("p.price_cents >= ?", [FilterValue::Int(500)]);

        assert_eq!(
            filter.where_sql(),
            " WHERE p.is_active = 1 AND (p.name LIKE ? ESCAPE '\\' OR p.description LIKE ? ESCAPE '\\') AND p.price_cents >= ?"
        );
        assert_eq!(filter.binds().len(), 3);
        assert_eq!(filter.binds()[2], FilterValue::Int(500));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" rye "), "%rye%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
