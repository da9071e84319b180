//! Password hashing (Argon2id)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::common::ApiError;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Argon2id hash with the default parameters that no password matches.
/// Log-in checks against it when the email is unknown, so both failure paths
/// run one full verification.
pub const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$tmkuNEBX5ZMpsW/MZ+N9YA$5xH9iBL+2fI7rjvzs3DKLniVHjryNSaazbcvOKRqQQE";

/// Hash a password using Argon2id with a random salt
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::InternalServer(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored hash. Malformed hashes count as a
/// mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
