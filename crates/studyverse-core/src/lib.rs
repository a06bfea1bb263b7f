//! # studyverse-core
//!
//! Foundation types and pure logic shared by every StudyVerse crate.
//!
//! - **Study context**: [`StudyContext`] describing what the student is studying
//! - **Prompt compiler**: [`compile_context_prompt`] renders a context preamble
//! - **Quiz**: [`QuizQuestion`] with fail-closed decoding, [`QuizRun`] progress
//! - **Chat**: [`ChatTurn`] and [`ChatRole`] for tutor transcripts
//! - **History**: [`HistoryStore`] of bounded, most-recent-first lists
//! - **Audio**: [`decode_pcm_base64`] for 24 kHz mono PCM speech payloads
//! - **Timer**: [`StudyTimer`] countdown for focused study sessions
//! - **Errors**: [`StudyError`] with validation / generation / empty-result kinds
//! - **IDs**: `UserId`, `ConversationId` branded newtypes

#![deny(unsafe_code)]

pub mod audio;
pub mod chat;
pub mod context;
pub mod errors;
pub mod history;
pub mod ids;
pub mod logging;
pub mod prompt;
pub mod quiz;
pub mod timer;

pub use audio::{PCM_CHANNELS, PCM_SAMPLE_RATE, PcmAudio, decode_pcm_base64};
pub use chat::{ChatRole, ChatTurn};
pub use context::{Difficulty, QuestionCount, QuestionType, StudyContext};
pub use errors::{ErrorKind, StudyError, StudyResult};
pub use history::{
    BoundedHistory, DashboardCounts, HISTORY_CAPACITY, HistoryStore, OutlineRecord, QuizRecord,
    SummaryRecord, TutorConversation,
};
pub use ids::{ConversationId, UserId};
pub use prompt::{CONTEXT_SEPARATOR, LanguageScope, compile_context_prompt, language_directive};
pub use quiz::{AnswerFeedback, QuizPhase, QuizQuestion, QuizRun, QuizScore};
pub use timer::{DEFAULT_SESSION_SECS, StudyTimer};
