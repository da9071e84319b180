// src/blogs/validators.rs

use super::models::CreateBlog;
use crate::common::{ValidationResult, Validator};

pub struct BlogValidator;

impl Validator<CreateBlog> for BlogValidator {
    fn validate(&self, data: &CreateBlog) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() {
            result.add_error("title", "Title is required");
        } else if data.title.len() > 200 {
            result.add_error("title", "Title must be less than 200 characters");
        }

        if data.content.trim().is_empty() {
            result.add_error("content", "Content is required");
        } else if data.content.len() > 100_000 {
            result.add_error("content", "Content is too long");
        }

        if data.excerpt.as_ref().is_some_and(|e| e.len() > 500) {
            result.add_error("excerpt", "Excerpt must be less than 500 characters");
        }

        result
    }
}
