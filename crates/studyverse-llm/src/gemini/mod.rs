//! Gemini backend.
//!
//! Talks to the Gemini REST `generateContent` endpoint with API key
//! authentication. Text, JSON-schema and speech responses all use the same
//! endpoint; the [`ResponseShape`](crate::backend::ResponseShape) of the
//! request selects the generation config.

pub mod provider;
pub mod types;

pub use provider::{GeminiBackend, GeminiConfig};
