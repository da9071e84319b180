//! Session cookies
//!
//! - `token`: signed session token, HttpOnly
//! - `user_role`: role name, HttpOnly, informational only
//! - `user_session`: `<user_id>:<role>` for the client to read

use axum::http::{header, HeaderMap, HeaderName};
use cookie::{time::Duration, Cookie, SameSite};

use super::models::Role;

pub const TOKEN_COOKIE: &str = "token";
pub const ROLE_COOKIE: &str = "user_role";
pub const SESSION_COOKIE: &str = "user_session";

fn base_cookie(name: &'static str, value: String, secure: bool) -> cookie::CookieBuilder<'static> {
    let same_site = if secure { SameSite::Strict } else { SameSite::Lax };
    Cookie::build((name, value))
        .path("/")
        .secure(secure)
        .same_site(same_site)
}

/// Cookies set after a successful register or log-in
pub fn session_cookies(
    token: &str,
    user_id: &str,
    role: Role,
    secure: bool,
    ttl_hours: i64,
) -> Vec<Cookie<'static>> {
    let max_age = Duration::hours(ttl_hours);
    vec![
        base_cookie(TOKEN_COOKIE, token.to_string(), secure)
            .http_only(true)
            .max_age(max_age)
            .build(),
        base_cookie(ROLE_COOKIE, role.as_str().to_string(), secure)
            .http_only(true)
            .max_age(max_age)
            .build(),
        base_cookie(SESSION_COOKIE, format!("{}:{}", user_id, role), secure)
            .max_age(max_age)
            .build(),
    ]
}

/// Expired copies of the session cookies, used on log-out
pub fn cleared_cookies(secure: bool) -> Vec<Cookie<'static>> {
    [TOKEN_COOKIE, ROLE_COOKIE, SESSION_COOKIE]
        .into_iter()
        .map(|name| {
            base_cookie(name, String::new(), secure)
                .http_only(name != SESSION_COOKIE)
                .max_age(Duration::ZERO)
                .build()
        })
        .collect()
}

/// `Set-Cookie` header pairs for use with `AppendHeaders`
pub fn set_cookie_headers(cookies: Vec<Cookie<'static>>) -> Vec<(HeaderName, String)> {
    cookies
        .into_iter()
        .map(|c| (header::SET_COOKIE, c.to_string()))
        .collect()
}

/// Read a cookie value from the request's `Cookie` headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
