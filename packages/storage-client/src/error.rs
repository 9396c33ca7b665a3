//! Error types for the storage client.

use thiserror::Error;

/// Result type for storage client operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage client errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport failure (connection refused, DNS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the storage API
    #[error("Storage API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl StorageError {
    /// True when the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StorageError::Http(e) if e.is_timeout())
    }
}
