//! Client construction errors.
//!
//! Operations never fail with these: every call outcome is an `ApiResult`.

use thiserror::Error;

/// Result type for client construction.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while building a `QuestClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL is not an absolute http(s) URL.
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
