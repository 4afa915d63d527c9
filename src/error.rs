//! Tasnif Error Types
//!
//! Centralized error handling for the taxonomy service.

use thiserror::Error;

/// Central error type for Tasnif
///
/// The first three variants are the tagged outcomes the HTTP layer maps
/// to distinct statuses and user-visible messages.
#[derive(Error, Debug)]
pub enum TasnifError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("remote mirror error: {0}")]
    Remote(String),

    #[error("lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Tasnif operations
pub type TasnifResult<T> = Result<T, TasnifError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for TasnifError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        TasnifError::Lock(err.to_string())
    }
}

impl From<reqwest::Error> for TasnifError {
    fn from(err: reqwest::Error) -> Self {
        TasnifError::Remote(err.to_string())
    }
}
