// src/client/dedup.rs
//! In-flight request de-duplication for listing calls.
//!
//! A listing request is identified by its fingerprint (path plus serialized
//! parameters). While one request with a fingerprint is outstanding, another
//! with the same fingerprint is not issued.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Stable identity of a listing request
pub fn request_fingerprint<P: Serialize>(path: &str, params: &P) -> String {
    let params = serde_json::to_string(params).unwrap_or_default();
    format!("{}?{}", path, params)
}

#[derive(Debug, Clone, Default)]
pub struct RequestDeduplicator {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl RequestDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `fingerprint`. Returns `None` when an identical request is
    /// already outstanding; otherwise the claim lasts until the guard drops.
    pub fn try_begin(&self, fingerprint: String) -> Option<InFlight> {
        let mut in_flight = self.in_flight.lock().ok()?;
        if !in_flight.insert(fingerprint.clone()) {
            return None;
        }
        Some(InFlight {
            registry: Arc::clone(&self.in_flight),
            fingerprint,
        })
    }

    pub fn is_in_flight(&self, fingerprint: &str) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(fingerprint))
            .unwrap_or(false)
    }
}

/// Releases its fingerprint on drop
#[derive(Debug)]
pub struct InFlight {
    registry: Arc<Mutex<HashSet<String>>>,
    fingerprint: String,
}

impl InFlight {
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Ok(mut set) = self.registry.lock() {
            set.remove(&self.fingerprint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::ProductQueryParams;

    #[test]
    fn test_fingerprint_depends_on_params() {
        let page_one = ProductQueryParams {
            page: Some(1),
            ..Default::default()
        };
        let page_two = ProductQueryParams {
            page: Some(2),
            ..Default::default()
        };

        assert_eq!(
            request_fingerprint("/api/products", &page_one),
            request_fingerprint("/api/products", &page_one.clone())
        );
        assert_ne!(
            request_fingerprint("/api/products", &page_one),
            request_fingerprint("/api/products", &page_two)
        );
        assert_ne!(
            request_fingerprint("/api/products", &page_one),
            request_fingerprint("/api/blogs", &page_one)
        );
    }

    #[test]
    fn test_duplicate_is_refused_until_guard_drops() {
        let dedup = RequestDeduplicator::new();

        let guard = dedup.try_begin("GET /api/products?{}".to_string()).unwrap();
        assert!(dedup.is_in_flight(guard.fingerprint()));
        assert!(dedup.try_begin("GET /api/products?{}".to_string()).is_none());
        assert!(dedup.try_begin("GET /api/blogs?{}".to_string()).is_some());

        drop(guard);
        assert!(!dedup.is_in_flight("GET /api/products?{}"));
        assert!(dedup.try_begin("GET /api/products?{}".to_string()).is_some());
    }

    #[test]
    fn test_clones_share_registry() {
        let dedup = RequestDeduplicator::new();
        let other = dedup.clone();
        let _guard = dedup.try_begin("x".to_string()).unwrap();
        assert!(other.try_begin("x".to_string()).is_none());
    }
}
