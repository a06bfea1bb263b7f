//! Error kinds surfaced to the host.
//!
//! Every failure inside the generation layer is converted into one of these
//! kinds at the operation boundary. Messages are user-facing; the underlying
//! transport error (if any) is kept as the [`std::error::Error::source`].
//!
//! - `Validation`: required context missing or a precondition failed. Raised
//!   before any backend call and never retried.
//! - `Generation`: the backend failed, returned unparseable structured data, or
//!   returned an empty required payload.
//! - `EmptyResult`: a quiz parsed cleanly but contained no questions. The host
//!   returns to its input state instead of starting a quiz.
//! - `Audio`: a speech payload could not be decoded for playback.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed source error carried by [`StudyError::Generation`].
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for StudyVerse operations.
pub type StudyResult<T> = Result<T, StudyError>;

/// Errors returned by StudyVerse operations.
#[derive(Debug, Error)]
pub enum StudyError {
    /// Required input missing or invalid.
    #[error("{message}")]
    Validation {
        /// User-facing description.
        message: String,
    },

    /// The generation backend failed or returned unusable output.
    #[error("{message}")]
    Generation {
        /// User-facing description.
        message: String,
        /// Underlying failure.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Generation succeeded but produced nothing usable.
    #[error("{message}")]
    EmptyResult {
        /// User-facing description.
        message: String,
    },

    /// Audio payload could not be decoded.
    #[error("Failed to play audio. {message}")]
    Audio {
        /// Decode failure detail.
        message: String,
    },
}

impl StudyError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a generation error without a source.
    #[must_use]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a generation error wrapping the underlying failure.
    #[must_use]
    pub fn generation_with_source(
        message: impl Into<String>,
        source: impl Into<BoxedSource>,
    ) -> Self {
        Self::Generation {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an empty-result error.
    #[must_use]
    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::EmptyResult {
            message: message.into(),
        }
    }

    /// Create an audio decode error.
    #[must_use]
    pub fn audio(message: impl Into<String>) -> Self {
        Self::Audio {
            message: message.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Generation { .. } => ErrorKind::Generation,
            Self::EmptyResult { .. } => ErrorKind::EmptyResult,
            Self::Audio { .. } => ErrorKind::Audio,
        }
    }

    /// Whether the host should offer the user a "try again" action.
    ///
    /// The core never retries on its own.
    #[must_use]
    pub fn user_may_retry(&self) -> bool {
        matches!(self, Self::Generation { .. } | Self::Audio { .. })
    }
}

/// Error classification for logging and host routing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`StudyError::Validation`].
    Validation,
    /// See [`StudyError::Generation`].
    Generation,
    /// See [`StudyError::EmptyResult`].
    EmptyResult,
    /// See [`StudyError::Audio`].
    Audio,
}

impl ErrorKind {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Generation => "generation",
            Self::EmptyResult => "empty_result",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
