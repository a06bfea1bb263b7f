//! Study task gateway.
//!
//! [`GenerationGateway`] turns a [`StudyContext`] into backend requests for the
//! four one-shot tasks (summary, quiz, outline, narration) and opens tutor
//! [`ConversationSession`]s.
//!
//! Operations do not validate required context fields; the session layer
//! does that before calling in. Every backend failure is logged and converted
//! into a [`StudyError`] with a user-facing message. Nothing is retried.

use std::sync::Arc;

use studyverse_core::quiz::parse_quiz_questions;
use studyverse_core::{QuizQuestion, StudyContext, StudyError, StudyResult};
use tracing::{debug, error, instrument, warn};

use crate::backend::{GenerateRequest, GenerationBackend, ResponseShape};
use crate::conversation::ConversationSession;
use crate::prompts;
use crate::schema::quiz_schema;

/// Message for a failed summary.
pub const SUMMARY_FAILED: &str = "Failed to generate summary. Please try again.";
/// Message for a failed or unparseable quiz.
pub const QUIZ_FAILED: &str = "Failed to generate quiz. The provided context might be insufficient. Please provide more details.";
/// Message for a quiz that parsed but had no questions.
pub const QUIZ_EMPTY: &str = "Couldn't generate a quiz. The provided context might be insufficient.";
/// Message for a failed outline.
pub const OUTLINE_FAILED: &str = "Failed to generate outline. Please try again.";
/// Message for failed narration.
pub const AUDIO_FAILED: &str = "Failed to generate audio. Please try again.";

/// Model and voice selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Model for text tasks and tutoring.
    pub text_model: String,
    /// Model for speech synthesis.
    pub tts_model: String,
    /// Prebuilt narration voice.
    pub voice: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            text_model: "gemini-2.5-flash".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
        }
    }
}

/// Entry point for all generation tasks.
#[derive(Clone)]
pub struct GenerationGateway {
    backend: Arc<dyn GenerationBackend>,
    config: GatewayConfig,
}

impl GenerationGateway {
    /// Gateway with default models.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::with_config(backend, GatewayConfig::default())
    }

    /// Gateway with explicit models.
    pub fn with_config(backend: Arc<dyn GenerationBackend>, config: GatewayConfig) -> Self {
        Self { backend, config }
    }

    /// Model and voice selection.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Markdown summary of the topic.
    #[instrument(skip_all, fields(task = "summary", model = %self.config.text_model))]
    pub async fn summarize(&self, context: &StudyContext) -> StudyResult<String> {
        let request = GenerateRequest::prompt(&self.config.text_model, prompts::summary_prompt(context));
        self.generate_text(&request, SUMMARY_FAILED).await
    }

    /// Markdown essay outline for the topic.
    #[instrument(skip_all, fields(task = "outline", model = %self.config.text_model))]
    pub async fn generate_outline(&self, context: &StudyContext) -> StudyResult<String> {
        let request = GenerateRequest::prompt(&self.config.text_model, prompts::outline_prompt(context));
        self.generate_text(&request, OUTLINE_FAILED).await
    }

    /// Multiple-choice practice questions.
    ///
    /// Extra questions beyond the requested count are dropped.
    #[instrument(skip_all, fields(task = "quiz", model = %self.config.text_model))]
    pub async fn generate_quiz(&self, context: &StudyContext) -> StudyResult<Vec<QuizQuestion>> {
        let requested = context.effective_question_count().get();
        let request = GenerateRequest::prompt(&self.config.text_model, prompts::quiz_prompt(context))
            .with_response(ResponseShape::Json {
                schema: quiz_schema(),
            });

        let response = self.backend.generate(&request).await.map_err(|e| {
            error!(error = %e, category = e.category(), "quiz generation failed");
            StudyError::generation_with_source(QUIZ_FAILED, e)
        })?;

        let Some(json) = response.text.as_deref() else {
            error!("quiz response had no text");
            return Err(StudyError::generation(QUIZ_FAILED));
        };

        let mut questions = parse_quiz_questions(json).map_err(|e| {
            error!(error = %e, "quiz response did not match the item contract");
            StudyError::generation_with_source(QUIZ_FAILED, e)
        })?;

        if questions.is_empty() {
            warn!("quiz response contained no questions");
            return Err(StudyError::empty_result(QUIZ_EMPTY));
        }
        if questions.len() != requested {
            warn!(requested, received = questions.len(), "quiz length differs from request");
            questions.truncate(requested);
        }
        let unanswerable = questions.iter().filter(|q| !q.answer_in_options()).count();
        if unanswerable > 0 {
            warn!(unanswerable, "quiz answers missing from their options");
        }

        debug!(count = questions.len(), "quiz generated");
        Ok(questions)
    }

    /// Base64 PCM narration of `text`.
    #[instrument(skip_all, fields(task = "audio", model = %self.config.tts_model))]
    pub async fn synthesize_audio(&self, text: &str) -> StudyResult<String> {
        if text.trim().is_empty() {
            return Err(StudyError::validation("There is no text to read aloud."));
        }
        let request = GenerateRequest::prompt(&self.config.tts_model, prompts::narration_prompt(text))
            .with_response(ResponseShape::Audio {
                voice: self.config.voice.clone(),
            });

        let response = self.backend.generate(&request).await.map_err(|e| {
            error!(error = %e, category = e.category(), "audio generation failed");
            StudyError::generation_with_source(AUDIO_FAILED, e)
        })?;

        match response.audio {
            Some(audio) if !audio.data.is_empty() => Ok(audio.data),
            _ => {
                error!("no audio data returned");
                Err(StudyError::generation(AUDIO_FAILED))
            }
        }
    }

    /// Open a tutor conversation bound to this context. Issues no request.
    pub fn open_conversation(&self, context: &StudyContext) -> ConversationSession {
        let session = ConversationSession::new(
            self.backend.clone(),
            self.config.text_model.clone(),
            prompts::tutor_system_instruction(context),
        );
        debug!(conversation_id = %session.id(), "tutor conversation opened");
        session
    }

    async fn generate_text(&self, request: &GenerateRequest, failure: &str) -> StudyResult<String> {
        let response = self.backend.generate(request).await.map_err(|e| {
            error!(error = %e, category = e.category(), "generation failed");
            StudyError::generation_with_source(failure, e)
        })?;
        match response.non_empty_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                error!("generation returned no text");
                Err(StudyError::generation(failure))
            }
        }
    }
}

impl std::fmt::Debug for GenerationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationGateway")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use assert_matches::assert_matches;
    use serde_json::json;
    use studyverse_core::{ChatTurn, ErrorKind, QuizRun};

    use super::*;
    use crate::mock::MockBackend;

    fn gateway(backend: &Arc<MockBackend>) -> GenerationGateway {
        GenerationGateway::new(backend.clone())
    }

    fn quiz_json(count: usize) -> String {
        let items: Vec<_> = (0..count)
            .map(|i| {
                json!({
                    "question": format!("Question {i}?"),
                    "options": ["A", "B", "C", "D"],
                    "correctAnswer": "A",
                    "explanation": "Because A."
                })
            })
            .collect();
        serde_json::Value::Array(items).to_string()
    }

    // ── summarize / outline ──────────────────────────────────────────

    #[tokio::test]
    async fn summarize_returns_markdown() {
        let backend = Arc::new(MockBackend::new().with_text("# Photosynthesis\n- light"));
        let out = gateway(&backend)
            .summarize(&StudyContext::sample_quiz())
            .await
            .unwrap();
        assert_eq!(out, "# Photosynthesis\n- light");

        let req = backend.last_request().unwrap();
        assert_eq!(req.model, "gemini-2.5-flash");
        assert_eq!(req.response, ResponseShape::Text);
        assert!(req.contents[0].text.contains("Generate a detailed summary"));
    }

    #[tokio::test]
    async fn summarize_failure_is_generation_error() {
        let backend = Arc::new(MockBackend::new().with_error(500, "internal"));
        let err = gateway(&backend)
            .summarize(&StudyContext::sample_summary())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert_eq!(err.to_string(), SUMMARY_FAILED);
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn outline_empty_text_is_generation_error() {
        let backend = Arc::new(MockBackend::new().with_text(""));
        let err = gateway(&backend)
            .generate_outline(&StudyContext::sample_outline())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), OUTLINE_FAILED);
    }

    // ── quiz ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn quiz_length_matches_request() {
        let backend = Arc::new(MockBackend::new().with_text(quiz_json(3)));
        let questions = gateway(&backend)
            .generate_quiz(&StudyContext::sample_quiz())
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.options().len() == 4));

        let req = backend.last_request().unwrap();
        assert_matches!(&req.response, ResponseShape::Json { schema } if schema["type"] == "ARRAY");
    }

    #[tokio::test]
    async fn quiz_extra_items_are_dropped() {
        let backend = Arc::new(MockBackend::new().with_text(quiz_json(5)));
        let questions = gateway(&backend)
            .generate_quiz(&StudyContext::sample_quiz())
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn quiz_malformed_json_is_generation_error() {
        let backend = Arc::new(MockBackend::new().with_text("[{\"question\": \"x\"}]"));
        let err = gateway(&backend)
            .generate_quiz(&StudyContext::sample_quiz())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert_eq!(err.to_string(), QUIZ_FAILED);
    }

    #[tokio::test]
    async fn quiz_wrong_option_count_is_generation_error() {
        let body = json!([{
            "question": "Q?",
            "options": ["A", "B", "C"],
            "correctAnswer": "A",
            "explanation": "E"
        }])
        .to_string();
        let backend = Arc::new(MockBackend::new().with_text(body));
        let err = gateway(&backend)
            .generate_quiz(&StudyContext::sample_quiz())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
    }

    #[tokio::test]
    async fn quiz_empty_array_is_empty_result() {
        let backend = Arc::new(MockBackend::new().with_text("[]"));
        let err = gateway(&backend)
            .generate_quiz(&StudyContext::sample_quiz())
            .await
            .unwrap_err();
        assert_matches!(err, StudyError::EmptyResult { .. });
    }

    #[tokio::test]
    async fn quiz_answer_outside_options_only_misscores() {
        let body = json!([{
            "question": "Q?",
            "options": ["A", "B", "C", "D"],
            "correctAnswer": "E",
            "explanation": "E"
        }])
        .to_string();
        let backend = Arc::new(MockBackend::new().with_text(body));
        let ctx = StudyContext::sample_quiz()
            .with_question_count(studyverse_core::QuestionCount::new(1).unwrap());
        let questions = gateway(&backend).generate_quiz(&ctx).await.unwrap();
        assert!(!questions[0].answer_in_options());

        let mut run = QuizRun::start(questions).unwrap();
        let feedback = run.submit_answer("A").unwrap();
        assert!(!feedback.correct);
        assert_eq!(run.score().correct, 0);
    }

    // ── audio ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn audio_returns_base64_payload() {
        let backend = Arc::new(MockBackend::new().with_audio("AAEC"));
        let data = gateway(&backend).synthesize_audio("Plants").await.unwrap();
        assert_eq!(data, "AAEC");

        let req = backend.last_request().unwrap();
        assert_eq!(req.model, "gemini-2.5-flash-preview-tts");
        assert_eq!(req.contents, vec![ChatTurn::user("Here is the summary: Plants")]);
        assert_eq!(
            req.response,
            ResponseShape::Audio {
                voice: "Kore".into()
            }
        );
    }

    #[tokio::test]
    async fn audio_missing_payload_is_generation_error() {
        let backend = Arc::new(MockBackend::new().with_text("I cannot speak"));
        let err = gateway(&backend).synthesize_audio("Plants").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
        assert_eq!(err.to_string(), AUDIO_FAILED);
    }

    #[tokio::test]
    async fn audio_empty_candidate_is_generation_error() {
        let backend = Arc::new(MockBackend::new().with_empty());
        let err = gateway(&backend).synthesize_audio("Plants").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);
    }

    #[tokio::test]
    async fn audio_empty_text_is_rejected_without_call() {
        let backend = Arc::new(MockBackend::new());
        let err = gateway(&backend).synthesize_audio("  ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(backend.call_count(), 0);
    }

    // ── tutor ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn open_conversation_issues_no_request() {
        let backend = Arc::new(MockBackend::new());
        let session = gateway(&backend).open_conversation(&StudyContext::sample_quiz());
        assert_eq!(backend.call_count(), 0);
        assert!(session.transcript().is_empty());
        assert!(
            session
                .system_instruction()
                .starts_with("You are a friendly and encouraging AI Tutor.")
        );
        assert!(session.system_instruction().contains("Subject: Science"));
    }

    #[tokio::test]
    async fn custom_models_are_used() {
        let backend = Arc::new(MockBackend::new().with_text("ok"));
        let gw = GenerationGateway::with_config(
            backend.clone(),
            GatewayConfig {
                text_model: "gemini-2.5-pro".into(),
                ..GatewayConfig::default()
            },
        );
        let _ = gw.generate_outline(&StudyContext::sample_outline()).await.unwrap();
        assert_eq!(backend.last_request().unwrap().model, "gemini-2.5-pro");
    }
}
