// src/cart/validators.rs

use super::models::*;
use crate::common::id_generator::parse_product_number;
use crate::common::{ValidationResult, Validator};

fn validate_product_id(result: &mut ValidationResult, product_id: &str) {
    if parse_product_number(product_id).is_none() {
        result.add_error("product_id", "Invalid product ID format");
    }
}

pub struct AddToCartValidator;

impl Validator<AddToCart> for AddToCartValidator {
    fn validate(&self, data: &AddToCart) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_product_id(&mut result, &data.product_id);
        if !(1..=MAX_LINE_QUANTITY).contains(&data.quantity) {
            result.add_error("quantity", "Quantity must be between 1 and 99");
        }
        result
    }
}

pub struct UpdateCartValidator;

impl Validator<UpdateCartItem> for UpdateCartValidator {
    fn validate(&self, data: &UpdateCartItem) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_product_id(&mut result, &data.product_id);
        if !(0..=MAX_LINE_QUANTITY).contains(&data.quantity) {
            result.add_error("quantity", "Quantity must be between 0 and 99");
        }
        result
    }
}
