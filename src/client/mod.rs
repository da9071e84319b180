// src/client/mod.rs
//! Typed storefront client.
//!
//! Wraps the HTTP API with `reqwest` and keeps the shopper's favorites and
//! cart consistent across sign-in: while signed out they live in a
//! [`LocalStore`], after sign-in on the server.

pub mod api;
pub mod cart;
pub mod dedup;
pub mod error;
pub mod favorites;
pub mod store;

pub use api::ApiClient;
pub use cart::{CartMergeReport, CartSession};
pub use dedup::{request_fingerprint, InFlight, RequestDeduplicator};
pub use error::ClientError;
pub use favorites::{FavoritesSession, MigrationReport, SessionState};
pub use store::{JsonFileStore, LocalCartLine, LocalFavorite, LocalStore, MemoryStore};
