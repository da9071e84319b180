// src/client/favorites.rs
//! Favorites for a shopper who may or may not be signed in.
//!
//! While [`SessionState::Guest`] the list lives in the [`LocalStore`]. On
//! [`FavoritesSession::sign_in`] the local list is merged into the account
//! (one bulk call per batch), the local store is cleared, and the server list
//! becomes authoritative.

use chrono::Utc;
use tracing::{debug, info};

use super::api::ApiClient;
use super::error::ClientError;
use super::store::{LocalFavorite, LocalStore};
use crate::favorites::{BulkFavoriteItem, BulkFavoritesRequest, MAX_BULK_FAVORITES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Guest,
    Authenticated,
}

/// Outcome of moving a guest list into an account
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub uploaded: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

pub struct FavoritesSession<S: LocalStore> {
    api: ApiClient,
    store: S,
    state: SessionState,
    /// Server list, newest first; only meaningful when authenticated
    server_ids: Vec<String>,
}

impl<S: LocalStore> FavoritesSession<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            state: SessionState::Guest,
            server_ids: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Product ids in the active list
    pub fn product_ids(&self) -> Result<Vec<String>, ClientError> {
        match self.state {
            SessionState::Guest => Ok(self
                .store
                .load_favorites()?
                .into_iter()
                .map(|f| f.product_id)
                .collect()),
            SessionState::Authenticated => Ok(self.server_ids.clone()),
        }
    }

    pub fn contains(&self, product_id: &str) -> Result<bool, ClientError> {
        Ok(self.product_ids()?.iter().any(|id| id == product_id))
    }

    /// Add a product. Adding one that is already there is a no-op.
    pub async fn add(&mut self, product_id: &str) -> Result<(), ClientError> {
        match self.state {
            SessionState::Guest => {
                let mut favorites = self.store.load_favorites()?;
                if favorites.iter().any(|f| f.product_id == product_id) {
                    return Ok(());
                }
                favorites.push(LocalFavorite {
                    product_id: product_id.to_string(),
                    added_at: Utc::now(),
                });
                self.store.save_favorites(&favorites)
            }
            SessionState::Authenticated => {
                match self.api.add_favorite(product_id).await {
                    Ok(_) => {}
                    Err(e) if e.is_conflict() => {
                        debug!(product_id = %product_id, "Favorite already on server");
                    }
                    Err(e) => return Err(e),
                }
                if !self.server_ids.iter().any(|id| id == product_id) {
                    self.server_ids.insert(0, product_id.to_string());
                }
                Ok(())
            }
        }
    }

    /// Remove a product. Removing one that is not there is a no-op.
    pub async fn remove(&mut self, product_id: &str) -> Result<(), ClientError> {
        match self.state {
            SessionState::Guest => {
                let mut favorites = self.store.load_favorites()?;
                let before = favorites.len();
                favorites.retain(|f| f.product_id != product_id);
                if favorites.len() != before {
                    self.store.save_favorites(&favorites)?;
                }
                Ok(())
            }
            SessionState::Authenticated => {
                self.api.remove_favorite(product_id).await?;
                self.server_ids.retain(|id| id != product_id);
                Ok(())
            }
        }
    }

    pub async fn toggle(&mut self, product_id: &str) -> Result<bool, ClientError> {
        if self.contains(product_id)? {
            self.remove(product_id).await?;
            Ok(false)
        } else {
            self.add(product_id).await?;
            Ok(true)
        }
    }

    /// Reload the server list
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        if self.state == SessionState::Authenticated {
            self.server_ids = self
                .api
                .list_favorites()
                .await?
                .into_iter()
                .map(|f| f.product_id)
                .collect();
        }
        Ok(())
    }

    /// Move to the authenticated state after the API client has signed in.
    ///
    /// Runs once per sign-in: the guest list is uploaded in batches, each
    /// batch leaves the local store once the server accepted it, and the
    /// server list is fetched. Ids the server does not know are skipped, so
    /// a stale guest entry never blocks the migration. Calling it again while
    /// authenticated just refreshes.
    pub async fn sign_in(&mut self) -> Result<MigrationReport, ClientError> {
        if self.state == SessionState::Authenticated {
            self.refresh().await?;
            return Ok(MigrationReport::default());
        }
        if !self.api.is_authenticated() {
            return Err(ClientError::Invalid(
                "sign in with the API client before migrating favorites".to_string(),
            ));
        }

        let local = self.store.load_favorites()?;
        let mut report = MigrationReport {
            uploaded: local.len(),
            ..Default::default()
        };

        for batch in local.chunks(MAX_BULK_FAVORITES) {
            let request = BulkFavoritesRequest {
                items: batch
                    .iter()
                    .map(|f| BulkFavoriteItem::Entry {
                        product_id: f.product_id.clone(),
                        added_at: Some(f.added_at),
                    })
                    .collect(),
            };
            let response = self.api.bulk_favorites(&request).await?;
            report.inserted += response.inserted;
            report.updated += response.updated;
            report.skipped += response.skipped;

            let uploaded: Vec<&str> = batch.iter().map(|f| f.product_id.as_str()).collect();
            let remaining: Vec<LocalFavorite> = self
                .store
                .load_favorites()?
                .into_iter()
                .filter(|f| !uploaded.contains(&f.product_id.as_str()))
                .collect();
            self.store.save_favorites(&remaining)?;
        }
        self.state = SessionState::Authenticated;
        self.refresh().await?;

        info!(
            uploaded = report.uploaded,
            inserted = report.inserted,
            skipped = report.skipped,
            total = self.server_ids.len(),
            "Guest favorites migrated"
        );
        Ok(report)
    }

    /// Back to guest with an empty local list
    pub fn sign_out(&mut self) {
        self.state = SessionState::Guest;
        self.server_ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::store::MemoryStore;

    fn guest_session() -> FavoritesSession<MemoryStore> {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        FavoritesSession::new(api, MemoryStore::default())
    }

    #[tokio::test]
    async fn test_guest_add_is_idempotent() {
        let mut session = guest_session();

        session.add("oaw-001").await.unwrap();
        session.add("oaw-001").await.unwrap();
        session.add("oaw-002").await.unwrap();

        assert_eq!(session.state(), SessionState::Guest);
        assert_eq!(session.product_ids().unwrap(), vec!["oaw-001", "oaw-002"]);
    }

    #[tokio::test]
    async fn test_guest_remove_and_toggle() {
        let mut session = guest_session();

        assert!(session.toggle("oaw-003").await.unwrap());
        assert!(session.contains("oaw-003").unwrap());
        assert!(!session.toggle("oaw-003").await.unwrap());
        assert!(!session.contains("oaw-003").unwrap());

        session.remove("oaw-404").await.unwrap();
        assert!(session.product_ids().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_requires_signed_in_client() {
        let mut session = guest_session();
        session.add("oaw-001").await.unwrap();

        let err = session.sign_in().await.unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
        // Nothing lost
        assert_eq!(session.store().load_favorites().unwrap().len(), 1);
        assert_eq!(session.state(), SessionState::Guest);
    }
}
