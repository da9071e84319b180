// Common module - shared types and utilities across all modules

pub mod config;
pub mod error;
pub mod extract;
pub mod filters;
pub mod helpers;
pub mod id_generator;
pub mod migrations;
pub mod pagination;
pub mod slug;
pub mod state;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{is_unique_violation, ApiError};
pub use extract::{AppJson, AppQuery};
pub use helpers::{redact_secrets, safe_email_log, safe_token_log};
pub use id_generator::*;
pub use pagination::{Paginated, Pagination};
pub use state::AppState;
pub use validation::{ValidationError, ValidationResult, Validator};

/// Shared state handle injected into every handler
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<AppState>>;
