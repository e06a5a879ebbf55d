/// Error types for calls against the backend API
use thiserror::Error;

/// Errors surfaced by the API client and by client-side validation.
///
/// Every variant except [`ApiError::Cancelled`] is meant to be shown to the
/// operator as a transient notification; none of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network or transport failure (connection refused, timeout, non-JSON body)
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with `success: false` or a non-2xx status
    #[error("{message}")]
    Rejected {
        /// HTTP status code of the response
        status: u16,
        /// Human-readable message taken from the envelope
        message: String,
    },

    /// The stored token is missing, expired or refused by the backend
    #[error("Your session has expired. Please log in again.")]
    Unauthorized,

    /// Input refused before any request was made
    #[error("{0}")]
    Validation(String),

    /// The response did not have the expected shape
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// The request was superseded and deliberately aborted
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Transport("the server took too long to respond".into())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
