//! # Generation backend
//!
//! Core abstraction over a text/speech generation service. The gateway builds
//! a [`GenerateRequest`] per operation and hands it to a
//! [`GenerationBackend`]; the backend owns transport, authentication and
//! timeouts.
//!
//! [`BackendError`] never leaves this crate's gateway boundary: operations
//! convert it into a user-facing `StudyError`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studyverse_core::ChatTurn;

/// Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur while calling a generation backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or rejected credentials.
    #[error("Auth error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// Backend returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
        /// Backend-specific status code, e.g. `RESOURCE_EXHAUSTED`.
        code: Option<String>,
    },

    /// The call succeeded but produced no usable candidate.
    #[error("empty response{}", reason_suffix(.reason.as_deref()))]
    EmptyCandidate {
        /// Finish or block reason reported by the backend.
        reason: Option<String>,
    },

    /// Backend-specific error.
    #[error("{message}")]
    Other {
        /// Error description.
        message: String,
    },
}

impl BackendError {
    /// Error category string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(_) => "network",
            Self::Json(_) => "parse",
            Self::Auth { .. } => "auth",
            Self::Api { status: 429, .. } => "rate_limit",
            Self::Api { .. } => "api",
            Self::EmptyCandidate { .. } => "empty",
            Self::Other { .. } => "unknown",
        }
    }

    /// Whether repeating the same request could succeed.
    ///
    /// Informational only; nothing in this crate retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Json(_)
            | Self::Auth { .. }
            | Self::EmptyCandidate { .. }
            | Self::Other { .. } => false,
        }
    }
}

fn reason_suffix(reason: Option<&str>) -> String {
    reason.map(|r| format!(" ({r})")).unwrap_or_default()
}

/// Expected shape of the backend output.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseShape {
    /// Free text (markdown).
    Text,
    /// JSON constrained by a response schema.
    Json {
        /// Schema the output must satisfy.
        schema: serde_json::Value,
    },
    /// Synthesized speech with a prebuilt voice.
    Audio {
        /// Voice name, e.g. `"Kore"`.
        voice: String,
    },
}

impl ResponseShape {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json { .. } => "json",
            Self::Audio { .. } => "audio",
        }
    }
}

/// A single one-shot generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerateRequest {
    /// Model identifier.
    pub model: String,
    /// Optional system instruction bound to the call.
    pub system_instruction: Option<String>,
    /// Ordered conversation contents; one user turn for one-shot tasks.
    pub contents: Vec<ChatTurn>,
    /// Expected output shape.
    pub response: ResponseShape,
}

impl GenerateRequest {
    /// One user-turn text request.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents: vec![ChatTurn::user(prompt)],
            response: ResponseShape::Text,
        }
    }

    /// Multi-turn chat request.
    pub fn chat(model: impl Into<String>, contents: Vec<ChatTurn>) -> Self {
        Self {
            model: model.into(),
            system_instruction: None,
            contents,
            response: ResponseShape::Text,
        }
    }

    /// Attach a system instruction.
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Set the expected output shape.
    #[must_use]
    pub fn with_response(mut self, response: ResponseShape) -> Self {
        self.response = response;
        self
    }
}

/// Inline binary payload returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineAudio {
    /// MIME type, e.g. `audio/L16;codec=pcm;rate=24000`.
    pub mime_type: String,
    /// Base64-encoded data.
    pub data: String,
}

/// Backend output for one call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Concatenated text parts, if any.
    pub text: Option<String>,
    /// First inline data part, if any.
    pub audio: Option<InlineAudio>,
}

impl GenerateResponse {
    /// Text-only response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            audio: None,
        }
    }

    /// Audio-only response.
    pub fn audio(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            audio: Some(InlineAudio {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }

    /// Text, treating whitespace-only output as absent.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// A text/speech generation service.
///
/// Implementors must be `Send + Sync`; the gateway shares one backend across
/// operations behind an `Arc`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend identifier for logging (e.g. `"gemini"`).
    fn name(&self) -> &str;

    /// Perform one generation call.
    async fn generate(&self, request: &GenerateRequest) -> BackendResult<GenerateResponse>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
