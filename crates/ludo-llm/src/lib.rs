//! Ludo LLM - text-generation backends
//!
//! This crate provides the backend side of the Ludo design assistant:
//! - Backend: the `TextGenerationBackend` capability and request/response types
//! - Groq: chat-completion style backend (OpenAI-compatible)
//! - Gemini: generate-content style backend
//! - Dispatch: `BackendAdapter`, which never fails and logs usage
//! - Usage: usage log entries, sinks and statistics
//! - Mock: scripted backend for tests

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod gemini;
pub mod groq;
pub mod mock;
pub mod usage;
pub mod util;

pub use backend::{
    BackendKind, Generation, GenerationRequest, TextGenerationBackend, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use dispatch::{BackendAdapter, DispatchResult};
pub use error::{Error, Result};
pub use gemini::{GeminiBackend, GeminiConfig};
pub use groq::{GroqBackend, GroqConfig};
pub use mock::ScriptedBackend;
pub use usage::{NullUsageSink, UsageLog, UsageLogEntry, UsageSink, UsageStats};
