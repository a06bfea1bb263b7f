//! Session configuration derived from settings.

use std::time::Duration;

use studyverse_core::timer::DEFAULT_SESSION_SECS;
use studyverse_core::{Difficulty, HISTORY_CAPACITY, QuestionCount, QuestionType, StudyContext};
use studyverse_llm::GatewayConfig;
use studyverse_settings::StudyverseSettings;

/// Everything a [`StudySession`](crate::StudySession) needs besides its
/// backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Models and voice used by the gateway.
    pub gateway: GatewayConfig,
    /// Entries kept per history list, clamped to `1..=HISTORY_CAPACITY`.
    pub history_capacity: usize,
    /// Focus timer session length.
    pub timer_session: Duration,
    /// Difficulty applied when a quiz request leaves it unset.
    pub quiz_difficulty: Difficulty,
    /// Question count applied when a quiz request leaves it unset.
    pub quiz_question_count: QuestionCount,
    /// Question type applied when a quiz request leaves it unset.
    pub quiz_question_type: QuestionType,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            history_capacity: HISTORY_CAPACITY,
            timer_session: Duration::from_secs(DEFAULT_SESSION_SECS),
            quiz_difficulty: Difficulty::default(),
            quiz_question_count: QuestionCount::default(),
            quiz_question_type: QuestionType::default(),
        }
    }
}

impl SessionConfig {
    /// Build from loaded settings.
    pub fn from_settings(settings: &StudyverseSettings) -> studyverse_settings::Result<Self> {
        Ok(Self {
            gateway: GatewayConfig {
                text_model: settings.api.text_model.clone(),
                tts_model: settings.api.tts_model.clone(),
                voice: settings.api.voice_name.clone(),
            },
            history_capacity: settings.history.capacity,
            timer_session: settings.timer.session(),
            quiz_difficulty: settings.quiz.difficulty,
            quiz_question_count: settings.quiz.question_count()?,
            quiz_question_type: settings.quiz.question_type,
        })
    }

    /// Fill unset quiz fields with the configured defaults.
    pub(crate) fn apply_quiz_defaults(&self, context: &mut StudyContext) {
        let _ = context.difficulty.get_or_insert(self.quiz_difficulty);
        let _ = context
            .question_count
            .get_or_insert(self.quiz_question_count);
        let _ = context.question_type.get_or_insert(self.quiz_question_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_map_to_default_config() {
        let config = SessionConfig::from_settings(&StudyverseSettings::default()).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn settings_values_are_carried() {
        let mut settings = StudyverseSettings::default();
        settings.api.text_model = "gemini-2.5-pro".into();
        settings.api.voice_name = "Puck".into();
        settings.history.capacity = 3;
        settings.timer.session_minutes = 50;
        settings.quiz.question_count = 8;

        let config = SessionConfig::from_settings(&settings).unwrap();
        assert_eq!(config.gateway.text_model, "gemini-2.5-pro");
        assert_eq!(config.gateway.voice, "Puck");
        assert_eq!(config.history_capacity, 3);
        assert_eq!(config.timer_session, Duration::from_secs(3000));
        assert_eq!(config.quiz_question_count.get(), 8);
    }

    #[test]
    fn invalid_quiz_count_is_rejected() {
        let mut settings = StudyverseSettings::default();
        settings.quiz.question_count = 0;
        assert!(SessionConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn quiz_defaults_keep_explicit_values() {
        let config = SessionConfig {
            quiz_difficulty: Difficulty::Hard,
            ..SessionConfig::default()
        };
        let mut context = StudyContext::new().with_question_type(QuestionType::FourMark);
        config.apply_quiz_defaults(&mut context);
        assert_eq!(context.difficulty, Some(Difficulty::Hard));
        assert_eq!(context.question_count, Some(QuestionCount::default()));
        assert_eq!(context.question_type, Some(QuestionType::FourMark));
    }
}
