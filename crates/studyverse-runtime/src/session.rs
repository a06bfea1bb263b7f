//! The per-user study session.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use studyverse_auth::{
    AuthError, AuthResult, FederatedProvider, Identity, IdentityProvider,
    InMemoryIdentityProvider, InMemoryProfileStore, ProfileStore, UserProfile,
};
use studyverse_core::{
    AnswerFeedback, ChatTurn, DashboardCounts, HistoryStore, PcmAudio, QuizPhase, QuizRun,
    QuizScore, StudyContext, StudyError, StudyResult, StudyTimer, decode_pcm_base64,
};
use studyverse_llm::{ConversationSession, GenerationBackend, GenerationGateway};
use tracing::{debug, info, instrument};

use crate::config::SessionConfig;

/// Shown when a quiz request lacks subject or chapter.
pub const QUIZ_NEEDS_TOPIC: &str =
    "Please provide at least a subject and chapter/topic to generate a quiz from.";
/// Shown when an outline request lacks a topic.
pub const OUTLINE_NEEDS_TOPIC: &str = "Please enter a topic in the \"Chapter Name / Topic\" field.";

const NO_QUIZ: &str = "Generate a quiz first.";
const QUIZ_NOT_IN_HISTORY: &str = "That quiz is no longer in your history.";
const NO_TUTOR: &str = "Start a tutor conversation first.";

/// Snapshot shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Display name of the signed-in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// History list sizes.
    pub counts: DashboardCounts,
    /// Credited focus time in seconds.
    pub study_secs: u64,
}

impl Dashboard {
    /// Credited focus time in whole minutes.
    pub fn study_minutes(&self) -> u64 {
        self.study_secs / 60
    }
}

/// Owner of all study state for one user.
pub struct StudySession {
    config: SessionConfig,
    gateway: GenerationGateway,
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    profile: Option<UserProfile>,
    history: HistoryStore,
    quiz: Option<QuizRun>,
    tutor: Option<ConversationSession>,
    timer: StudyTimer,
    study_secs: u64,
}

impl StudySession {
    /// Session over `backend` with in-memory identity and profile stores.
    pub fn new(backend: Arc<dyn GenerationBackend>, config: SessionConfig) -> Self {
        Self {
            gateway: GenerationGateway::with_config(backend, config.gateway.clone()),
            identity: Arc::new(InMemoryIdentityProvider::new()),
            profiles: Arc::new(InMemoryProfileStore::new()),
            profile: None,
            history: HistoryStore::with_capacity(config.history_capacity),
            quiz: None,
            tutor: None,
            timer: StudyTimer::with_duration(config.timer_session),
            study_secs: 0,
            config,
        }
    }

    /// Replace the identity provider and profile store.
    #[must_use]
    pub fn with_auth(
        mut self,
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        self.identity = identity;
        self.profiles = profiles;
        self.profile = None;
        self
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ── identity and profile ────────────────────────────────────────────

    /// Currently signed-in identity.
    pub fn identity(&self) -> Option<Identity> {
        self.identity.current()
    }

    /// Profile of the signed-in user, once loaded.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Create an account, sign it in and load its profile.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        let identity = self.identity.sign_up_with_password(email, password).await?;
        let _ = self.load_profile().await?;
        Ok(identity)
    }

    /// Sign in with email and password and load the profile.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> AuthResult<Identity> {
        let identity = self.identity.sign_in_with_password(email, password).await?;
        let _ = self.load_profile().await?;
        Ok(identity)
    }

    /// Sign in through a federated provider and load the profile.
    pub async fn sign_in_with_provider(
        &mut self,
        provider: FederatedProvider,
    ) -> AuthResult<Identity> {
        let identity = self.identity.sign_in_with_provider(provider).await?;
        let _ = self.load_profile().await?;
        Ok(identity)
    }

    /// Sign out and forget the loaded profile.
    pub async fn sign_out(&mut self) -> AuthResult<()> {
        self.identity.sign_out().await?;
        self.profile = None;
        Ok(())
    }

    /// Load the profile: identity fields first, stored document on top.
    pub async fn load_profile(&mut self) -> AuthResult<&UserProfile> {
        let identity = self.identity.current().ok_or(AuthError::NotSignedIn)?;
        let stored = self.profiles.load(&identity.uid).await?.unwrap_or_default();
        let profile = UserProfile::prefilled(&identity).overlay(&stored);
        debug!(uid = %identity.uid, "profile loaded");
        Ok(self.profile.insert(profile))
    }

    /// Save the profile of the signed-in user.
    pub async fn save_profile(&mut self, profile: UserProfile) -> AuthResult<()> {
        let identity = self.identity.current().ok_or(AuthError::NotSignedIn)?;
        self.profiles.save(&identity.uid, &profile).await?;
        self.profile = Some(profile);
        info!(uid = %identity.uid, "profile updated");
        Ok(())
    }

    /// Owned copy of `context` with profile class and board filled in.
    fn snapshot(&self, context: &StudyContext) -> StudyContext {
        let mut snapshot = context.clone();
        if let Some(profile) = &self.profile {
            snapshot.fill_academic_defaults(profile.class_name(), profile.board());
        }
        snapshot
    }

    // ── one-shot generation ─────────────────────────────────────────────

    /// Generate a summary and record it.
    #[instrument(skip_all)]
    pub async fn summarize(&mut self, context: &StudyContext) -> StudyResult<String> {
        context.require_topic()?;
        let snapshot = self.snapshot(context);
        let summary = self.gateway.summarize(&snapshot).await?;
        self.history.push_summary(snapshot, summary.clone());
        Ok(summary)
    }

    /// Narrate `text` and decode the returned PCM.
    #[instrument(skip_all)]
    pub async fn listen(&self, text: &str) -> StudyResult<PcmAudio> {
        let data = self.gateway.synthesize_audio(text).await?;
        let audio = decode_pcm_base64(&data)?;
        debug!(samples = audio.samples().len(), "narration decoded");
        Ok(audio)
    }

    /// Generate an essay outline and record it.
    #[instrument(skip_all)]
    pub async fn generate_outline(&mut self, context: &StudyContext) -> StudyResult<String> {
        if context.chapter().is_none() {
            return Err(StudyError::validation(OUTLINE_NEEDS_TOPIC));
        }
        let snapshot = self.snapshot(context);
        let outline = self.gateway.generate_outline(&snapshot).await?;
        self.history.push_outline(snapshot, outline.clone());
        Ok(outline)
    }

    // ── quiz ────────────────────────────────────────────────────────────

    /// Generate a quiz, record it and start an attempt.
    ///
    /// Any previous attempt is discarded, also when generation fails.
    #[instrument(skip_all)]
    pub async fn generate_quiz(&mut self, context: &StudyContext) -> StudyResult<&QuizRun> {
        context
            .require_topic()
            .map_err(|_| StudyError::validation(QUIZ_NEEDS_TOPIC))?;
        self.quiz = None;

        let mut snapshot = self.snapshot(context);
        self.config.apply_quiz_defaults(&mut snapshot);
        let questions = self.gateway.generate_quiz(&snapshot).await?;
        self.history.push_quiz(snapshot, questions.clone());

        let run = QuizRun::start(questions)?;
        info!(questions = run.questions().len(), "quiz started");
        Ok(self.quiz.insert(run))
    }

    /// Active quiz attempt.
    pub fn quiz(&self) -> Option<&QuizRun> {
        self.quiz.as_ref()
    }

    /// Answer the current question.
    pub fn submit_answer(&mut self, option: &str) -> StudyResult<AnswerFeedback> {
        self.active_quiz()?.submit_answer(option)
    }

    /// Move past the answered question.
    pub fn next_question(&mut self) -> StudyResult<QuizPhase> {
        let phase = self.active_quiz()?.next_question()?;
        if phase == QuizPhase::Results {
            if let Some(score) = self.quiz_score() {
                info!(correct = score.correct, total = score.total, "quiz finished");
            }
        }
        Ok(phase)
    }

    /// Score of the active attempt.
    pub fn quiz_score(&self) -> Option<QuizScore> {
        self.quiz.as_ref().map(QuizRun::score)
    }

    /// Drop the active attempt.
    pub fn reset_quiz(&mut self) {
        self.quiz = None;
    }

    /// Start a fresh attempt at a quiz from history, newest first.
    ///
    /// The backend is not called and history is left unchanged.
    pub fn retake_quiz(&mut self, index: usize) -> StudyResult<&QuizRun> {
        let questions = self
            .history
            .quizzes()
            .iter()
            .nth(index)
            .map(|record| record.questions.clone())
            .ok_or_else(|| StudyError::validation(QUIZ_NOT_IN_HISTORY))?;
        let run = QuizRun::start(questions)?;
        info!(index, questions = run.questions().len(), "quiz restarted");
        Ok(self.quiz.insert(run))
    }

    fn active_quiz(&mut self) -> StudyResult<&mut QuizRun> {
        self.quiz
            .as_mut()
            .ok_or_else(|| StudyError::validation(NO_QUIZ))
    }

    // ── tutor ───────────────────────────────────────────────────────────

    /// Open a tutor conversation, closing any open one first.
    pub fn open_tutor(&mut self, context: &StudyContext) -> &ConversationSession {
        let _ = self.close_tutor();
        let snapshot = self.snapshot(context);
        let session = self.gateway.open_conversation(&snapshot);
        self.tutor.insert(session)
    }

    /// Open tutor conversation.
    pub fn tutor(&self) -> Option<&ConversationSession> {
        self.tutor.as_ref()
    }

    /// Send a message to the open tutor.
    pub async fn tutor_send(&mut self, text: &str) -> StudyResult<ChatTurn> {
        let tutor = self
            .tutor
            .as_mut()
            .ok_or_else(|| StudyError::validation(NO_TUTOR))?;
        tutor.send(text).await
    }

    /// Close the open tutor and record its transcript if it has one.
    ///
    /// Returns whether a history entry was stored.
    pub fn close_tutor(&mut self) -> bool {
        let Some(mut tutor) = self.tutor.take() else {
            return false;
        };
        let id = tutor.id().clone();
        let transcript = tutor.close();
        let stored = self.history.push_conversation(id, transcript);
        debug!(stored, "tutor conversation closed");
        stored
    }

    // ── timer ───────────────────────────────────────────────────────────

    /// Focus timer.
    pub fn timer(&self) -> &StudyTimer {
        &self.timer
    }

    /// Start or pause the focus timer.
    pub fn toggle_timer(&mut self) {
        self.timer.toggle();
    }

    /// Stop and rewind the focus timer.
    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    /// Advance the focus timer, crediting a completed session.
    ///
    /// Returns the seconds credited by this tick.
    pub fn tick_timer(&mut self, elapsed: Duration) -> Option<u64> {
        let credited = self.timer.tick(elapsed.as_secs())?;
        self.study_secs += credited;
        info!(credited, total = self.study_secs, "focus session complete");
        Some(credited)
    }

    /// Total credited focus time.
    pub fn study_time(&self) -> Duration {
        Duration::from_secs(self.study_secs)
    }

    // ── dashboard ───────────────────────────────────────────────────────

    /// History lists.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Dashboard snapshot.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            display_name: self
                .profile
                .as_ref()
                .map(|p| p.display_name.trim().to_owned())
                .filter(|name| !name.is_empty()),
            counts: self.history.counts(),
            study_secs: self.study_secs,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
