//! Search client error types.

use std::sync::Arc;

/// Errors from the search endpoint client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Endpoint URL could not be parsed.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body was not JSON.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ClientError::Timeout } else { ClientError::Network(Arc::new(err)) }
    }
}

impl From<ClientError> for sift_core::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Decode(msg) => sift_core::Error::DecodeFailure(msg),
            other => sift_core::Error::NetworkFailure(other.to_string()),
        }
    }
}
