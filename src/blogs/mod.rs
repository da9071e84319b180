// src/blogs/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::*;
pub use routes::blogs_routes;
pub use services::BlogsService;
