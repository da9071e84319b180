//! Authentication handlers

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse},
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

use super::cookies::{cleared_cookies, session_cookies, set_cookie_headers};
use super::extractors::AuthedUser;
use super::models::{
    AuthResponse, CurrentUser, LoginRequest, RegisterRequest, Role, User, USER_COLUMNS,
};
use super::password::{
    hash_password, verify_password, MIN_PASSWORD_LENGTH, UNKNOWN_USER_HASH,
};
use super::tokens::issue_token;
use crate::common::{
    generate_user_id, is_unique_violation, safe_email_log, ApiError, AppJson, AppState,
    SharedState, ValidationResult, Validator,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"))
}

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let email = data.email.trim();
        if email.is_empty() {
            result.add_error("email", "Email is required");
        } else if email.len() > 254 || !email_pattern().is_match(email) {
            result.add_error("email", "Email is invalid");
        }

        if data.password.chars().count() < MIN_PASSWORD_LENGTH {
            result.add_error("password", "Password must be at least 8 characters");
        } else if data.password.len() > 256 {
            result.add_error("password", "Password must be less than 256 characters");
        }

        if let Some(name) = &data.name {
            if name.len() > 100 {
                result.add_error("name", "Name must be less than 100 characters");
            }
        }

        result
    }
}

async fn fetch_user_by_email(state: &AppState, email: &str) -> Result<Option<User>, ApiError> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.email = ?",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)
}

/// Build the response shared by register and log-in: token, cookies and body
fn session_response(
    state: &AppState,
    status: StatusCode,
    user: User,
) -> Result<impl IntoResponse, ApiError> {
    let role: Role = user.role.parse().map_err(ApiError::InternalServer)?;
    let token = issue_token(&state.jwt_secret, &user.id, role, state.token_ttl_hours)?;
    let cookies = session_cookies(
        &token,
        &user.id,
        role,
        state.secure_cookies,
        state.token_ttl_hours,
    );

    Ok((
        status,
        AppendHeaders(set_cookie_headers(cookies)),
        Json(AuthResponse {
            token,
            is_admin: role == Role::Admin,
            user,
        }),
    ))
}

/// POST /api/auth/register
/// Creates a password account and starts a session
///
/// # Request Body
/// ```json
/// { "email": "baker@example.com", "password": "at-least-8", "name": "Baker" }
/// ```
pub async fn register(
    Extension(state_lock): Extension<SharedState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    RegisterValidator.validate(&payload).into_result()?;

    let email = payload.email.trim().to_lowercase();
    let role = if state.admin_emails.contains(&email) {
        Role::Admin
    } else {
        Role::User
    };
    let id = generate_user_id();
    let password_hash = hash_password(&payload.password)?;

    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_hash, provider, provider_id, role_id)
        VALUES (?, ?, ?, ?, 'password', ?, (SELECT id FROM roles WHERE name = ?))
        "#,
    )
    .bind(&id)
    .bind(&email)
    .bind(payload.name.as_deref().map(str::trim))
    .bind(&password_hash)
    .bind(&id)
    .bind(role.as_str())
    .execute(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            warn!(email = %safe_email_log(&email), "Registration rejected: email already in use");
            ApiError::Conflict("An account with this email already exists".to_string())
        } else {
            error!(error = %e, email = %safe_email_log(&email), "Database error creating user");
            ApiError::DatabaseError(e)
        }
    })?;

    let user = fetch_user_by_email(&state, &email)
        .await?
        .ok_or_else(|| ApiError::InternalServer("user missing after insert".to_string()))?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        role = %user.role,
        "New user account created"
    );

    session_response(&state, StatusCode::CREATED, user)
}

/// POST /api/auth/log-in
/// Unknown email and wrong password both yield the same 401
pub async fn log_in(
    Extension(state_lock): Extension<SharedState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let user = fetch_user_by_email(&state, &email).await?;

    let stored_hash = user
        .as_ref()
        .map_or(UNKNOWN_USER_HASH, |u| u.password_hash.as_str());
    let verified = verify_password(&payload.password, stored_hash);

    let Some(user) = user.filter(|_| verified) else {
        warn!(email = %safe_email_log(&email), "Log-in failed: invalid credentials");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User log-in successful"
    );

    session_response(&state, StatusCode::OK, user)
}

/// POST /api/auth/log-out
/// Tokens are stateless, so log-out expires the session cookies
pub async fn log_out(
    Extension(state_lock): Extension<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let secure = state_lock.read().await.secure_cookies;
    debug!("Clearing session cookies");

    Ok((
        AppendHeaders(set_cookie_headers(cleared_cookies(secure))),
        Json(serde_json::json!({ "message": "Logout successful" })),
    ))
}

/// GET /api/auth/me
pub async fn me(
    Extension(state_lock): Extension<SharedState>,
    authed: AuthedUser,
) -> Result<Json<CurrentUser>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = ?",
        USER_COLUMNS
    ))
    .bind(&authed.id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(CurrentUser {
        user,
        is_admin: authed.is_admin(),
    }))
}
