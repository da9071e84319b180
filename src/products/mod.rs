// src/products/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


// Re-export commonly used items
pub use models::*;
pub use routes::products_routes;
pub use services::ProductsService;
