//! Gemini - generate-content style backend
//!
//! The prompt goes in as `contents[0].parts[0].text` and the text comes back
//! in `candidates[0].content.parts[0].text`.

mod backend;
mod config;
mod types;


// Re-export public API
pub use backend::GeminiBackend;
pub use config::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, MODELS};
