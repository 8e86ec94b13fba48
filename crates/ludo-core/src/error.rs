//! Error types for ludo-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Storage collaborator failure (I/O, schema, corrupt rows)
    #[error("store error: {0}")]
    Store(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// LLM backend error
    #[error("llm error: {0}")]
    Llm(#[from] ludo_llm::Error),
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Store(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
