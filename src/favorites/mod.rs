// src/favorites/mod.rs

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use models::*;
pub use routes::favorites_routes;
pub use services::FavoritesService;
