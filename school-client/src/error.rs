//! Client error types

use serde_json::Value;
use shared::StoreError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with an error status
    #[error("Store error ({status}): {body}")]
    Api { status: u16, body: Value },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for StoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, body } => {
                let err = StoreError::from_payload(&body);
                if err.code.is_none() {
                    err.with_code(status.to_string())
                } else {
                    err
                }
            }
            ClientError::Http(e) if e.is_timeout() => {
                StoreError::transport(format!("Request to the store timed out: {e}"))
            }
            ClientError::Http(e) if e.is_connect() => {
                StoreError::transport(format!("Could not connect to the store: {e}"))
            }
            ClientError::Http(e) => StoreError::transport(e.to_string()),
            ClientError::InvalidResponse(msg) => StoreError::transport(msg),
            ClientError::Serialization(e) => e.into(),
        }
    }
}
