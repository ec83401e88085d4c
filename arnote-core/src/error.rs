//! Error types for core operations.
//!
//! Most of the core never fails: configuration repair and asset fallbacks are
//! absorbed locally. Only persistence of whole records surfaces errors.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing configuration records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store refused the write.
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The record identifier is not acceptable to the store.
    #[error("Invalid record id: {0}")]
    InvalidId(String),

    /// An I/O error occurred during file persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether retrying the same operation later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::Rejected("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Write rejected: quota exceeded");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::Unavailable("timeout".into()).is_retryable());
        assert!(!StoreError::Rejected("row level security".into()).is_retryable());
        assert!(!StoreError::InvalidId("../x".into()).is_retryable());
    }

    #[test]
    fn test_from_serde_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let err: StoreError = parse.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
