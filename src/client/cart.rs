// src/client/cart.rs
//! Cart that follows the shopper across sign-in.

use reqwest::StatusCode;
use tracing::{info, warn};

use super::api::ApiClient;
use super::error::ClientError;
use super::favorites::SessionState;
use super::store::{LocalCartLine, LocalStore};
use crate::cart::{Cart, MAX_LINE_QUANTITY};
use crate::common::id_generator::parse_product_number;

/// Outcome of merging a guest cart into an account
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CartMergeReport {
    pub merged_lines: usize,
    /// Lines that hit the per-line limit and were set to it
    pub capped_lines: usize,
    /// Products that no longer exist
    pub dropped_lines: usize,
}

pub struct CartSession<S: LocalStore> {
    api: ApiClient,
    store: S,
    state: SessionState,
    server_cart: Cart,
}

impl<S: LocalStore> CartSession<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            state: SessionState::Guest,
            server_cart: Cart::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lines(&self) -> Result<Vec<LocalCartLine>, ClientError> {
        match self.state {
            SessionState::Guest => self.store.load_cart(),
            SessionState::Authenticated => Ok(self
                .server_cart
                .items
                .iter()
                .map(|l| LocalCartLine {
                    product_id: l.product_id.clone(),
                    quantity: l.quantity,
                })
                .collect()),
        }
    }

    pub fn quantity_of(&self, product_id: &str) -> Result<i64, ClientError> {
        Ok(self
            .lines()?
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity))
    }

    /// Add `quantity` units, accumulating onto an existing line
    pub async fn add(&mut self, product_id: &str, quantity: i64) -> Result<(), ClientError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(ClientError::Invalid(format!(
                "quantity must be between 1 and {}",
                MAX_LINE_QUANTITY
            )));
        }

        match self.state {
            SessionState::Guest => {
                let mut lines = self.store.load_cart()?;
                match lines.iter_mut().find(|l| l.product_id == product_id) {
                    Some(line) => line.quantity = (line.quantity + quantity).min(MAX_LINE_QUANTITY),
                    None => lines.push(LocalCartLine {
                        product_id: product_id.to_string(),
                        quantity,
                    }),
                }
                self.store.save_cart(&lines)
            }
            SessionState::Authenticated => {
                self.server_cart = self.api.add_to_cart(product_id, quantity).await?;
                Ok(())
            }
        }
    }

    /// Set an exact quantity; zero removes the line
    pub async fn set_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), ClientError> {
        if !(0..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(ClientError::Invalid(format!(
                "quantity must be between 0 and {}",
                MAX_LINE_QUANTITY
            )));
        }

        match self.state {
            SessionState::Guest => {
                let mut lines = self.store.load_cart()?;
                lines.retain(|l| l.product_id != product_id);
                if quantity > 0 {
                    lines.push(LocalCartLine {
                        product_id: product_id.to_string(),
                        quantity,
                    });
                }
                self.store.save_cart(&lines)
            }
            SessionState::Authenticated => {
                self.server_cart = self.api.update_cart(product_id, quantity).await?;
                Ok(())
            }
        }
    }

    pub async fn remove(&mut self, product_id: &str) -> Result<(), ClientError> {
        self.set_quantity(product_id, 0).await
    }

    pub async fn clear(&mut self) -> Result<(), ClientError> {
        match self.state {
            SessionState::Guest => self.store.clear_cart(),
            SessionState::Authenticated => {
                self.server_cart = self.api.clear_cart().await?;
                Ok(())
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        if self.state == SessionState::Authenticated {
            self.server_cart = self.api.get_cart().await?;
        }
        Ok(())
    }

    /// Merge the guest cart into the account with the same accumulating
    /// upsert as [`CartSession::add`].
    ///
    /// Each line leaves the local cart as soon as the server has it, so a
    /// retry after a failure only sends the lines that are still pending.
    pub async fn sign_in(&mut self) -> Result<CartMergeReport, ClientError> {
        if self.state == SessionState::Authenticated {
            self.refresh().await?;
            return Ok(CartMergeReport::default());
        }
        if !self.api.is_authenticated() {
            return Err(ClientError::Invalid(
                "sign in with the API client before merging the cart".to_string(),
            ));
        }

        let mut report = CartMergeReport::default();
        let mut pending = self.store.load_cart()?;
        while let Some(line) = pending.first().cloned() {
            self.merge_line(&line, &mut report).await?;
            pending.remove(0);
            self.store.save_cart(&pending)?;
        }

        self.state = SessionState::Authenticated;
        self.refresh().await?;

        info!(
            merged = report.merged_lines,
            capped = report.capped_lines,
            dropped = report.dropped_lines,
            "Guest cart merged"
        );
        Ok(report)
    }

    async fn merge_line(
        &self,
        line: &LocalCartLine,
        report: &mut CartMergeReport,
    ) -> Result<(), ClientError> {
        if parse_product_number(&line.product_id).is_none() || line.quantity < 1 {
            warn!(
                product_id = %line.product_id,
                quantity = line.quantity,
                "Dropping invalid guest cart line"
            );
            report.dropped_lines += 1;
            return Ok(());
        }

        let quantity = line.quantity.min(MAX_LINE_QUANTITY);
        match self.api.add_to_cart(&line.product_id, quantity).await {
            Ok(_) => report.merged_lines += 1,
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                warn!(product_id = %line.product_id, "Dropping guest cart line for missing product");
                report.dropped_lines += 1;
            }
            // Id and quantity are valid here, so a 400 means the accumulated
            // line would pass the limit
            Err(e) if e.status() == Some(StatusCode::BAD_REQUEST) => {
                match self.api.update_cart(&line.product_id, MAX_LINE_QUANTITY).await {
                    Ok(_) => report.capped_lines += 1,
                    Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                        report.dropped_lines += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Back to an empty guest cart
    pub fn sign_out(&mut self) {
        self.state = SessionState::Guest;
        self.server_cart = Cart::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::store::MemoryStore;

    fn guest_cart() -> CartSession<MemoryStore> {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        CartSession::new(api, MemoryStore::default())
    }

    #[tokio::test]
    async fn test_guest_add_accumulates_and_caps() {
        let mut cart = guest_cart();

        cart.add("oaw-001", 2).await.unwrap();
        cart.add("oaw-001", 3).await.unwrap();
        assert_eq!(cart.quantity_of("oaw-001").unwrap(), 5);
        assert_eq!(cart.lines().unwrap().len(), 1);

        cart.add("oaw-001", 99).await.unwrap();
        assert_eq!(cart.quantity_of("oaw-001").unwrap(), MAX_LINE_QUANTITY);
    }

    #[tokio::test]
    async fn test_guest_rejects_bad_quantities() {
        let mut cart = guest_cart();

        assert!(matches!(cart.add("oaw-001", 0).await, Err(ClientError::Invalid(_))));
        assert!(matches!(
            cart.set_quantity("oaw-001", 100).await,
            Err(ClientError::Invalid(_))
        ));
        assert!(cart.lines().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guest_set_and_remove() {
        let mut cart = guest_cart();

        cart.set_quantity("oaw-002", 4).await.unwrap();
        cart.add("oaw-003", 1).await.unwrap();
        assert_eq!(cart.quantity_of("oaw-002").unwrap(), 4);

        cart.remove("oaw-002").await.unwrap();
        assert_eq!(cart.quantity_of("oaw-002").unwrap(), 0);

        cart.clear().await.unwrap();
        assert!(cart.lines().unwrap().is_empty());
    }
}
