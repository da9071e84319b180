// src/cart/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use models::*;
pub use routes::cart_routes;
pub use services::CartService;
