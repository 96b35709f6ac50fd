//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to a survey store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected the API key.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The store returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A stored row could not be translated into the survey model.
    #[error("malformed {table} row {id}: {message}")]
    MalformedRow {
        table: &'static str,
        id: String,
        message: String,
    },
}
