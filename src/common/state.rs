// Application state shared across all modules

use sqlx::SqlitePool;
use std::collections::HashSet;

use super::config::AppConfig;

/// Application state containing the database pool and session settings
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub secure_cookies: bool,
    pub admin_emails: HashSet<String>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &AppConfig) -> Self {
        Self {
            db,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_hours: config.token_ttl_hours,
            secure_cookies: config.production,
            admin_emails: config.admin_emails.clone(),
        }
    }
}
