// src/client/error.rs
//! Storefront client errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`super::ApiClient`] and the session types.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The response body was not what the endpoint promises.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Local favorites/cart storage failed.
    #[error("local storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Rejected before any request was made.
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server reported the resource as already present.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
