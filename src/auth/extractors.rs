//! Authentication extractors for Axum
//!
//! `AuthedUser` and `AdminUser` are the single access-control gate: any
//! handler that takes one of them rejects the request before its body runs.

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{debug, error, warn};

use super::cookies::{read_cookie, TOKEN_COOKIE};
use super::models::{Claims, Role, User, USER_COLUMNS};
use super::tokens::verify_token;
use crate::common::{safe_email_log, ApiError, SharedState};

/// Authenticated user extractor
///
/// Reads the session token from the `token` cookie, falling back to an
/// `Authorization: Bearer` header when the cookie is absent or does not
/// verify, and loads the user. The role
/// comes from the database row, never from the `user_role` cookie.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl AuthedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authenticated user holding the admin role. Rejects with 403 otherwise.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthedUser);

/// Session tokens in the order they are tried: `token` cookie, then bearer
fn token_candidates(headers: &HeaderMap) -> Vec<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.strip_prefix("Bearer ").unwrap_or(s).trim().to_string())
        .filter(|s| !s.is_empty());

    read_cookie(headers, TOKEN_COOKIE)
        .into_iter()
        .chain(bearer)
        .collect()
}

/// First candidate that verifies wins; a stale cookie does not hide a valid
/// bearer token
fn verify_any(secret: &str, candidates: &[String]) -> Result<Claims, ApiError> {
    let mut last_err = ApiError::Unauthorized("missing auth".into());
    for token in candidates {
        match verify_token(secret, token) {
            Ok(claims) => return Ok(claims),
            Err(e) => last_err = e,
        }
    }
    Err(last_err)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<SharedState> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let candidates = token_candidates(&parts.headers);
        if candidates.is_empty() {
            warn!(path = %parts.uri.path(), "Authentication failed: missing session token");
            return Err(ApiError::Unauthorized("missing auth".into()));
        }

        let claims = verify_any(&app_state.jwt_secret, &candidates)?;

        let user: Option<User> = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = ?",
            USER_COLUMNS
        ))
        .bind(&claims.sub)
        .fetch_optional(&app_state.db)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                user_id = %claims.sub,
                "Database error during user lookup in authentication"
            );
            ApiError::DatabaseError(e)
        })?;

        let Some(user) = user else {
            warn!(user_id = %claims.sub, "Authentication failed: user not found in database");
            return Err(ApiError::Unauthorized("user not found".into()));
        };

        let role: Role = user.role.parse().map_err(|e: String| {
            error!(user_id = %user.id, error = %e, "User has an unknown role");
            ApiError::InternalServer(e)
        })?;

        if claims.role != role.as_str() {
            debug!(
                user_id = %user.id,
                token_role = %claims.role,
                role = %role,
                "Token role is stale, using stored role"
            );
        }

        debug!(
            user_id = %user.id,
            email = %safe_email_log(&user.email),
            role = %role,
            "User authentication successful via extractor"
        );

        Ok(AuthedUser {
            id: user.id,
            email: user.email,
            role,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authed = AuthedUser::from_request_parts(parts, state).await?;

        if !authed.is_admin() {
            warn!(
                user_id = %authed.id,
                path = %parts.uri.path(),
                "Admin access denied: admin privileges required"
            );
            return Err(ApiError::Forbidden("Admin privileges required".to_string()));
        }

        Ok(AdminUser(authed))
    }
}
