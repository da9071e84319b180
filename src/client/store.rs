// src/client/store.rs
//! Client-side storage for a signed-out shopper's favorites and cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFavorite {
    pub product_id: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCartLine {
    pub product_id: String,
    pub quantity: i64,
}

/// Where guest state is kept between visits
pub trait LocalStore {
    fn load_favorites(&self) -> Result<Vec<LocalFavorite>, ClientError>;
    fn save_favorites(&mut self, favorites: &[LocalFavorite]) -> Result<(), ClientError>;
    fn load_cart(&self) -> Result<Vec<LocalCartLine>, ClientError>;
    fn save_cart(&mut self, lines: &[LocalCartLine]) -> Result<(), ClientError>;

    fn clear_favorites(&mut self) -> Result<(), ClientError> {
        self.save_favorites(&[])
    }

    fn clear_cart(&mut self) -> Result<(), ClientError> {
        self.save_cart(&[])
    }
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    favorites: Vec<LocalFavorite>,
    cart: Vec<LocalCartLine>,
}

impl LocalStore for MemoryStore {
    fn load_favorites(&self) -> Result<Vec<LocalFavorite>, ClientError> {
        Ok(self.favorites.clone())
    }

    fn save_favorites(&mut self, favorites: &[LocalFavorite]) -> Result<(), ClientError> {
        self.favorites = favorites.to_vec();
        Ok(())
    }

    fn load_cart(&self) -> Result<Vec<LocalCartLine>, ClientError> {
        Ok(self.cart.clone())
    }

    fn save_cart(&mut self, lines: &[LocalCartLine]) -> Result<(), ClientError> {
        self.cart = lines.to_vec();
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    favorites: Vec<LocalFavorite>,
    #[serde(default)]
    cart: Vec<LocalCartLine>,
}

/// Guest state persisted as one JSON document. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read(&self) -> Result<StoredState, ClientError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(StoredState::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, state: &StoredState) -> Result<(), ClientError> {
        std::fs::write(&self.path, serde_json::to_vec_pretty(state)?)?;
        Ok(())
    }
}

impl LocalStore for JsonFileStore {
    fn load_favorites(&self) -> Result<Vec<LocalFavorite>, ClientError> {
        Ok(self.read()?.favorites)
    }

    fn save_favorites(&mut self, favorites: &[LocalFavorite]) -> Result<(), ClientError> {
        let mut state = self.read()?;
        state.favorites = favorites.to_vec();
        self.write(&state)
    }

    fn load_cart(&self) -> Result<Vec<LocalCartLine>, ClientError> {
        Ok(self.read()?.cart)
    }

    fn save_cart(&mut self, lines: &[LocalCartLine]) -> Result<(), ClientError> {
        let mut state = self.read()?;
        state.cart = lines.to_vec();
        self.write(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_store_round_trip_and_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "bakery-guest-{}.json",
            crate::common::generate_user_id()
        ));
        let mut store = JsonFileStore::new(&path);

        assert!(store.load_favorites().unwrap().is_empty());

        let favorite = LocalFavorite {
            product_id: "oaw-001".to_string(),
            added_at: Utc::now(),
        };
        store.save_favorites(std::slice::from_ref(&favorite)).unwrap();
        store
            .save_cart(&[LocalCartLine {
                product_id: "oaw-002".to_string(),
                quantity: 2,
            }])
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_favorites().unwrap(), vec![favorite]);
        assert_eq!(reopened.load_cart().unwrap()[0].quantity, 2);

        store.clear_favorites().unwrap();
        assert!(store.load_favorites().unwrap().is_empty());
        assert_eq!(store.load_cart().unwrap().len(), 1);

        std::fs::remove_file(&path).unwrap();
    }
}
