// src/common/config.rs
//! Process configuration read from the environment (and `.env`)

use anyhow::{bail, Context};
use std::collections::HashSet;
use std::env;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    /// `production` turns on `Secure` + `SameSite=Strict` session cookies
    pub production: bool,
    pub token_ttl_hours: i64,
    pub admin_emails: HashSet<String>,
    pub cors_origins: Vec<String>,
    pub reset_db: bool,
}

impl AppConfig {
    /// Load configuration. `DATABASE_URL` and `JWT_SECRET` are required.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading through `lookup`
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        if jwt_secret.len() < 16 {
            bail!("JWT_SECRET must be at least 16 characters");
        }

        let port = match lookup("PORT") {
            Some(p) => p.parse::<u16>().context("PORT must be a valid port number")?,
            None => 8080,
        };

        let token_ttl_hours = match lookup("TOKEN_TTL_HOURS") {
            Some(h) => h
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .context("TOKEN_TTL_HOURS must be a positive integer")?,
            None => 24,
        };

        let production = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        // Parse admin emails from comma-separated env var
        let admin_emails: HashSet<String> = lookup("ADMIN_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let reset_db = lookup("RESET_DB")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt_secret,
            port,
            production,
            token_ttl_hours,
            admin_emails,
            cors_origins,
            reset_db,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => bail!("{} must be set", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_required_values_are_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "0123456789abcdef")]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite://bakery.db")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://bakery.db"),
            ("JWT_SECRET", "0123456789abcdef"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl_hours, 24);
        assert!(!config.production);
        assert!(!config.reset_db);
        assert!(config.admin_emails.is_empty());
        assert_eq!(config.cors_origins.len(), 2);
    }

    #[test]
    fn test_admin_emails_are_normalized() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://bakery.db"),
            ("JWT_SECRET", "0123456789abcdef"),
            ("ADMIN_EMAILS", " Owner@Bakery.test ,, ops@bakery.test"),
            ("APP_ENV", "Production"),
        ]))
        .unwrap();

        assert!(config.admin_emails.contains("owner@bakery.test"));
        assert!(config.admin_emails.contains("ops@bakery.test"));
        assert_eq!(config.admin_emails.len(), 2);
        assert!(config.production);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://bakery.db"),
            ("JWT_SECRET", "short"),
        ]));
        assert!(result.is_err());
    }
}
