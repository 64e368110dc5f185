//! Client error types.

use eventdesk_core::storage::{repository_error_from_status, RepositoryError};
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for RepositoryError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::ServerError { status, message } => {
                repository_error_from_status(status, message)
            }
            ClientError::Request(e) if e.is_connect() || e.is_timeout() => {
                RepositoryError::ConnectionFailed(e.to_string())
            }
            ClientError::Request(e) => RepositoryError::QueryFailed(e.to_string()),
            ClientError::InvalidResponse(message) => RepositoryError::Serialization(message),
            ClientError::Json(e) => RepositoryError::Serialization(e.to_string()),
            ClientError::InvalidInput(message) => RepositoryError::InvalidData(message),
            ClientError::Url(e) => RepositoryError::InvalidData(e.to_string()),
        }
    }
}
