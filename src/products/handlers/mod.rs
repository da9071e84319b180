// src/products/handlers/mod.rs

pub mod admin;
pub mod public;
pub mod reviews;

pub use admin::*;
pub use public::*;
pub use reviews::*;
