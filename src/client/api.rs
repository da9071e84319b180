// src/client/api.rs
//! HTTP client for the storefront API.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::dedup::{request_fingerprint, RequestDeduplicator};
use super::error::ClientError;
use crate::auth::{AuthResponse, CurrentUser, LoginRequest, RegisterRequest};
use crate::blogs::{Blog, BlogQueryParams};
use crate::cart::{AddToCart, Cart, UpdateCartItem};
use crate::common::Paginated;
use crate::favorites::{BulkFavoritesRequest, BulkFavoritesResponse, Favorite, RemoveFavoriteResponse};
use crate::products::{Product, ProductQueryParams};

/// Storefront API client.
///
/// Clones share the HTTP connection pool, the cookie jar, the bearer token
/// and the in-flight request registry.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
    dedup: RequestDeduplicator,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
            dedup: RequestDeduplicator::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Decode a success body, or turn the `{ error, code }` body into
    /// [`ClientError::Status`].
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            debug!(status = %status, message = %message, "API returned an error");
            return Err(ClientError::Status { status, message });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Create an account; the returned token is kept for later calls.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, ClientError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.map(String::from),
        };
        let response = self
            .request(Method::POST, "/api/auth/register")
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.set_token(Some(auth.token.clone()));
        Ok(auth)
    }

    /// Sign in; the returned token is kept for later calls.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .request(Method::POST, "/api/auth/log-in")
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.set_token(Some(auth.token.clone()));
        Ok(auth)
    }

    pub async fn log_out(&self) -> Result<(), ClientError> {
        let response = self.request(Method::POST, "/api/auth/log-out").send().await;
        self.set_token(None);
        let _: Value = Self::decode(response?).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<CurrentUser, ClientError> {
        let response = self.request(Method::GET, "/api/auth/me").send().await?;
        Self::decode(response).await
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    pub async fn list_products(
        &self,
        params: &ProductQueryParams,
    ) -> Result<Paginated<Product>, ClientError> {
        let response = self
            .request(Method::GET, "/api/products")
            .query(params)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Like [`ApiClient::list_products`], but returns `Ok(None)` without a
    /// request when an identical listing call is still outstanding.
    pub async fn list_products_once(
        &self,
        params: &ProductQueryParams,
    ) -> Result<Option<Paginated<Product>>, ClientError> {
        let fingerprint = request_fingerprint("/api/products", params);
        let Some(_guard) = self.dedup.try_begin(fingerprint) else {
            debug!("Skipping duplicate in-flight product listing");
            return Ok(None);
        };
        self.list_products(params).await.map(Some)
    }

    pub async fn get_product(&self, slug: &str) -> Result<Product, ClientError> {
        let response = self
            .request(Method::GET, &format!("/api/products/{}", slug))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn best_selling(&self, limit: i64) -> Result<Vec<Product>, ClientError> {
        let response = self
            .request(Method::GET, "/api/products/best-selling")
            .query(&[("limit", limit)])
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn list_blogs(&self, params: &BlogQueryParams) -> Result<Paginated<Blog>, ClientError> {
        let response = self
            .request(Method::GET, "/api/blogs")
            .query(params)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Blog listing with the same in-flight de-duplication as products
    pub async fn list_blogs_once(
        &self,
        params: &BlogQueryParams,
    ) -> Result<Option<Paginated<Blog>>, ClientError> {
        let fingerprint = request_fingerprint("/api/blogs", params);
        let Some(_guard) = self.dedup.try_begin(fingerprint) else {
            debug!("Skipping duplicate in-flight blog listing");
            return Ok(None);
        };
        self.list_blogs(params).await.map(Some)
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    pub async fn list_favorites(&self) -> Result<Vec<Favorite>, ClientError> {
        let response = self.request(Method::GET, "/api/favorites").send().await?;
        Self::decode(response).await
    }

    /// Fails with a 409 [`ClientError::Status`] when already a favorite
    pub async fn add_favorite(&self, product_id: &str) -> Result<Favorite, ClientError> {
        let response = self
            .request(Method::POST, "/api/favorites")
            .json(&json!({ "product_id": product_id }))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn remove_favorite(
        &self,
        product_id: &str,
    ) -> Result<RemoveFavoriteResponse, ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/api/favorites/{}", product_id))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn bulk_favorites(
        &self,
        request: &BulkFavoritesRequest,
    ) -> Result<BulkFavoritesResponse, ClientError> {
        let response = self
            .request(Method::POST, "/api/favorites/bulk")
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    // ========================================================================
    // Cart
    // ========================================================================

    pub async fn get_cart(&self) -> Result<Cart, ClientError> {
        let response = self.request(Method::GET, "/api/cart").send().await?;
        Self::decode(response).await
    }

    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> Result<Cart, ClientError> {
        let body = AddToCart {
            product_id: product_id.to_string(),
            quantity,
        };
        let response = self
            .request(Method::POST, "/api/cart")
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn update_cart(&self, product_id: &str, quantity: i64) -> Result<Cart, ClientError> {
        let body = UpdateCartItem {
            product_id: product_id.to_string(),
            quantity,
        };
        let response = self
            .request(Method::PUT, "/api/cart")
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn remove_from_cart(&self, product_id: &str) -> Result<Cart, ClientError> {
        let response = self
            .request(Method::DELETE, "/api/cart")
            .query(&[("product_id", product_id)])
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn clear_cart(&self) -> Result<Cart, ClientError> {
        let response = self.request(Method::DELETE, "/api/cart").send().await?;
        Self::decode(response).await
    }
}
