// src/products/validators.rs

use super::models::*;
use crate::common::{ValidationResult, Validator};

pub const MAX_PRICE_CENTS: i64 = 10_000_000;
pub const MAX_STOCK: i64 = 100_000;
pub const MAX_BULK_IDS: usize = 100;

fn validate_name(result: &mut ValidationResult, name: &str) {
    if name.trim().is_empty() {
        result.add_error("name", "Product name is required");
    } else if name.len() > 120 {
        result.add_error("name", "Product name must be less than 120 characters");
    }
}

fn validate_numbers(result: &mut ValidationResult, price_cents: Option<i64>, stock: Option<i64>) {
    if let Some(price) = price_cents {
        if price < 0 {
            result.add_error("price_cents", "Price cannot be negative");
        } else if price > MAX_PRICE_CENTS {
            result.add_error("price_cents", "Price is too large");
        }
    }
    if let Some(stock) = stock {
        if !(0..=MAX_STOCK).contains(&stock) {
            result.add_error("stock", "Stock must be between 0 and 100000");
        }
    }
}

fn validate_text(result: &mut ValidationResult, description: Option<&str>, image_url: Option<&str>) {
    if description.is_some_and(|d| d.len() > 5000) {
        result.add_error("description", "Description must be less than 5000 characters");
    }
    if image_url.is_some_and(|u| u.len() > 2048) {
        result.add_error("image_url", "Image URL must be less than 2048 characters");
    }
}

pub struct ProductValidator;

impl Validator<CreateProduct> for ProductValidator {
    fn validate(&self, data: &CreateProduct) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_name(&mut result, &data.name);
        validate_numbers(&mut result, Some(data.price_cents), data.stock);
        validate_text(&mut result, data.description.as_deref(), data.image_url.as_deref());
        result
    }
}

impl Validator<UpdateProduct> for ProductValidator {
    fn validate(&self, data: &UpdateProduct) -> ValidationResult {
        let mut result = ValidationResult::new();
        if data.is_empty() {
            result.add_error("body", "At least one field must be provided");
            return result;
        }
        if let Some(name) = &data.name {
            validate_name(&mut result, name);
        }
        validate_numbers(&mut result, data.price_cents, data.stock);
        validate_text(&mut result, data.description.as_deref(), data.image_url.as_deref());
        result
    }
}

pub struct BulkDeleteValidator;

impl Validator<BulkProductDelete> for BulkDeleteValidator {
    fn validate(&self, data: &BulkProductDelete) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.ids.is_empty() {
            result.add_error("ids", "At least one product ID is required");
        } else if data.ids.len() > MAX_BULK_IDS {
            result.add_error("ids", "Cannot delete more than 100 products at once");
        }

        for (index, id) in data.ids.iter().enumerate() {
            if crate::common::id_generator::parse_product_number(id).is_none() {
                result.add_error(&format!("ids[{}]", index), "Invalid product ID format");
            }
        }

        result
    }
}

pub struct ReviewValidator;

impl Validator<CreateReview> for ReviewValidator {
    fn validate(&self, data: &CreateReview) -> ValidationResult {
        let mut result = ValidationResult::new();
        if !(1..=5).contains(&data.rating) {
            result.add_error("rating", "Rating must be between 1 and 5");
        }
        if data.comment.as_ref().is_some_and(|c| c.len() > 2000) {
            result.add_error("comment", "Comment must be less than 2000 characters");
        }
        result
    }
}
