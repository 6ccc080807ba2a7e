//! Tabular API error types.

use quantum_commerce::store::StoreError;
use thiserror::Error;

/// Errors that can occur when talking to the tabular API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// The request never got a response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// Non-2xx HTTP response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The API answered but reported `success: false`.
    #[error("Rejected by the data API: {0}")]
    Rejected(String),

    /// A returned row could not be turned into a domain record.
    #[error("Failed to decode row: {0}")]
    Decode(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Missing or invalid connection settings.
    #[error("Invalid API configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for DataError {
    fn from(e: serde_json::Error) -> Self {
        DataError::Json(e.to_string())
    }
}

impl From<DataError> for StoreError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::Transport(_) | DataError::Timeout | DataError::Config(_) => {
                StoreError::Unavailable(e.to_string())
            }
            DataError::Http { status, .. } if status >= 500 => {
                StoreError::Unavailable(e.to_string())
            }
            DataError::Http { .. } | DataError::Rejected(_) => StoreError::Rejected(e.to_string()),
            DataError::Decode(_) | DataError::Json(_) => StoreError::Malformed(e.to_string()),
        }
    }
}
