// Helper functions for safe logging

use serde_json::Value;

/// Keys whose values never reach the logs
const SECRET_KEYS: &[&str] = &["password", "password_hash"];

/// Keys logged in shortened form
const TOKEN_KEYS: &[&str] = &["token"];

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// use bakery_api::common::safe_email_log;
///
/// assert_eq!(safe_email_log("baker@example.com"), "b***@example.com");
/// ```
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if email.len() > 3 && !domain.contains('@') => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        _ => "***@***.***".to_string(),
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Replaces secret-bearing fields in a JSON document, recursing into
/// nested objects and arrays
pub fn redact_secrets(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) {
                    *v = Value::String("***".to_string());
                } else if TOKEN_KEYS.contains(&key.as_str()) {
                    *v = Value::String(match v {
                        Value::String(s) => safe_token_log(s),
                        _ => "***".to_string(),
                    });
                } else {
                    redact_secrets(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_secrets),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_email_log_masks_local_part() {
        assert_eq!(safe_email_log("baker@example.com"), "b***@example.com");
        assert_eq!(safe_email_log("a@b"), "***@***.***");
        assert_eq!(safe_email_log("not-an-email"), "***@***.***");
    }

    #[test]
    fn test_safe_token_log() {
        assert_eq!(safe_token_log("abcdefghijkl"), "abcd...ijkl");
        assert_eq!(safe_token_log("short"), "***");
    }

    #[test]
    fn test_redact_secrets_nested() {
        let mut body = json!({
            "email": "baker@example.com",
            "password": "hunter2hunter2",
            "user": { "token": "eyJhbGciOiJIUzI1NiJ9.payload.sig" },
            "items": [{ "password": 42 }]
        });
        redact_secrets(&mut body);

        assert_eq!(body["email"], "baker@example.com");
        assert_eq!(body["password"], "***");
        assert_eq!(body["user"]["token"], "eyJh....sig");
        assert_eq!(body["items"][0]["password"], "***");
    }
}
