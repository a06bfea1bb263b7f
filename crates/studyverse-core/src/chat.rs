//! Tutor chat turns.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The student.
    User,
    /// The generation service.
    Model,
}

impl ChatRole {
    /// Wire name (`"user"` / `"model"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One message in a conversation transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Author of the turn.
    pub role: ChatRole,
    /// Message text.
    pub text: String,
}

impl ChatTurn {
    /// A student turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// A model turn.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }

    /// Whether the student wrote this turn.
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}
