//! Error types for ludo-llm

use thiserror::Error;

/// Backend error type
#[derive(Debug, Error)]
pub enum Error {
    /// Backend not configured (missing key, bad client settings)
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    /// Non-2xx HTTP status returned by the backend
    #[error("API Error: {status} - {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transport failure (connection refused, DNS, TLS, ...)
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded the client timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Usage log sink failure
    #[error("usage log error: {0}")]
    Usage(String),
}

impl Error {
    /// Map a reqwest transport error, dropping the request URL.
    ///
    /// Generate-style backends carry the API key in the query string, so the
    /// URL must never reach an error message.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Error::Timeout(timeout_ms)
        } else if err.is_decode() {
            Error::InvalidResponse(err.without_url().to_string())
        } else {
            Error::Network(err.without_url().to_string())
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
