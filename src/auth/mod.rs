//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Password registration and log-in (Argon2id hashes)
//! - JWT session tokens carried in cookies or a bearer header
//! - The `AuthedUser` / `AdminUser` extractors guarding protected routes

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod tokens;


pub use extractors::{AdminUser, AuthedUser};
pub use models::{AuthResponse, CurrentUser, LoginRequest, RegisterRequest, Role, User};
pub use routes::auth_routes;
