//! Tutor conversation session.
//!
//! A [`ConversationSession`] owns one transcript and the system instruction
//! bound when it was opened. Every `send` sends the full transcript so the
//! backend sees the whole conversation.
//!
//! Backend failures never surface as errors: the session appends a fixed
//! apology turn and returns to [`ConversationState::Idle`], so a chat failure
//! cannot wedge the state machine.
//!
//! ```text
//!   Idle ──send──▶ AwaitingReply ──reply / failure──▶ Idle
//!     │                                                │
//!     └────────────────────close───────────────────────┴──▶ Closed
//! ```

use std::sync::Arc;

use studyverse_core::{ChatTurn, ConversationId, StudyError, StudyResult};
use tracing::{debug, error, instrument, warn};

use crate::backend::{GenerateRequest, GenerationBackend};

/// Model turn appended when the backend fails.
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Lifecycle of a conversation session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversationState {
    /// Ready to send.
    Idle,
    /// A send is in flight.
    AwaitingReply,
    /// Closed; no further sends.
    Closed,
}

/// One tutor conversation.
pub struct ConversationSession {
    id: ConversationId,
    backend: Arc<dyn GenerationBackend>,
    model: String,
    system_instruction: String,
    transcript: Vec<ChatTurn>,
    state: ConversationState,
}

impl ConversationSession {
    /// Open an idle session with an empty transcript.
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        model: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            id: ConversationId::new(),
            backend,
            model: model.into(),
            system_instruction: system_instruction.into(),
            transcript: Vec::new(),
            state: ConversationState::Idle,
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Current state.
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Turns so far, oldest first.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// System instruction bound at open.
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Send a student message and append the reply.
    ///
    /// Returns the appended model turn, which is the apology turn when the
    /// backend failed. Errors only for invalid input or state.
    #[instrument(skip_all, fields(conversation_id = %self.id, turn_count = self.transcript.len()))]
    pub async fn send(&mut self, text: &str) -> StudyResult<ChatTurn> {
        match self.state {
            ConversationState::Closed => {
                return Err(StudyError::validation("This conversation has ended."));
            }
            ConversationState::AwaitingReply => {
                return Err(StudyError::validation(
                    "Please wait for the tutor to finish replying.",
                ));
            }
            ConversationState::Idle => {}
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(StudyError::validation("Please enter a message."));
        }

        self.transcript.push(ChatTurn::user(text));
        self.state = ConversationState::AwaitingReply;

        let request = GenerateRequest::chat(self.model.clone(), self.transcript.clone())
            .with_system_instruction(self.system_instruction.clone());

        debug!(backend = self.backend.name(), "sending tutor turn");
        let reply = match self.backend.generate(&request).await {
            Ok(response) => {
                if let Some(reply) = response.non_empty_text() {
                    ChatTurn::model(reply)
                } else {
                    warn!("tutor reply was empty");
                    ChatTurn::model(APOLOGY_TEXT)
                }
            }
            Err(e) => {
                error!(error = %e, category = e.category(), "tutor turn failed");
                ChatTurn::model(APOLOGY_TEXT)
            }
        };

        self.transcript.push(reply.clone());
        self.state = ConversationState::Idle;
        Ok(reply)
    }

    /// Close the session and take its transcript.
    ///
    /// Returns an empty transcript when already closed or never used.
    pub fn close(&mut self) -> Vec<ChatTurn> {
        self.state = ConversationState::Closed;
        std::mem::take(&mut self.transcript)
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationSession")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("state", &self.state)
            .field("turns", &self.transcript.len())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
