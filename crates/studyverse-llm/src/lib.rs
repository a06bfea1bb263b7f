//! # studyverse-llm
//!
//! Generation layer for StudyVerse.
//!
//! - [`backend::GenerationBackend`]: the seam every model service implements
//! - [`gemini::GeminiBackend`]: Gemini `generateContent` over HTTP
//! - [`prompts`] and [`schema`]: fixed task templates and the quiz schema
//! - [`gateway::GenerationGateway`]: summary, quiz, outline, narration and
//!   tutor operations with user-facing error messages
//! - [`conversation::ConversationSession`]: fail-soft tutor chat state machine
//! - [`mock::MockBackend`]: scripted backend for tests and offline runs

#![deny(unsafe_code)]

pub mod backend;
pub mod conversation;
pub mod gateway;
pub mod gemini;
pub mod mock;
pub mod prompts;
pub mod schema;

pub use backend::{
    BackendError, BackendResult, GenerateRequest, GenerateResponse, GenerationBackend,
    InlineAudio, ResponseShape,
};
pub use conversation::{ConversationSession, ConversationState};
pub use gateway::{GatewayConfig, GenerationGateway};
pub use gemini::{GeminiBackend, GeminiConfig};
pub use mock::MockBackend;
