// src/common/id_generator.rs
//! Identifier generation
//!
//! Two schemes are in use:
//! - Crockford Base32 prefixed ids (`PREFIX_XXXXXX`) for users, blogs and
//!   reviews. No ambiguous characters (excludes I, L, O, U).
//! - Sequential catalog ids for products (`oaw-001`, `oaw-002`, ...), allocated
//!   from the current maximum inside the creating transaction.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Prefix of every product id
pub const PRODUCT_ID_PREFIX: &str = "oaw-";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Blog post (B_)
    Blog,
    /// Product review (R_)
    Review,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Blog => "B",
            EntityPrefix::Review => "R",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID, e.g. "U_K7NP3X"
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_blog_id() -> String {
    generate_id(EntityPrefix::Blog)
}

pub fn generate_review_id() -> String {
    generate_id(EntityPrefix::Review)
}

/// Format the n-th product id. Numbers are zero-padded to three digits and
/// grow past that without truncation (`oaw-999`, `oaw-1000`).
pub fn format_product_id(number: i64) -> String {
    format!("{}{:03}", PRODUCT_ID_PREFIX, number)
}

/// Parse the numeric part of a product id
pub fn parse_product_number(id: &str) -> Option<i64> {
    id.strip_prefix(PRODUCT_ID_PREFIX)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let user_id = generate_user_id();
        assert!(user_id.starts_with("U_"));
        assert_eq!(user_id.len(), 8);

        assert!(generate_blog_id().starts_with("B_"));
        assert!(generate_review_id().starts_with("R_"));
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_user_id();
        for c in id[2..].chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            assert!(ids.insert(generate_user_id()), "Duplicate ID generated");
        }
    }

    #[test]
    fn test_product_ids() {
        assert_eq!(format_product_id(1), "oaw-001");
        assert_eq!(format_product_id(42), "oaw-042");
        assert_eq!(format_product_id(1000), "oaw-1000");

        assert_eq!(parse_product_number("oaw-007"), Some(7));
        assert_eq!(parse_product_number("oaw-1000"), Some(1000));
        assert_eq!(parse_product_number("J_K7NP3X"), None);
        assert_eq!(parse_product_number("oaw-abc"), None);
    }
}
