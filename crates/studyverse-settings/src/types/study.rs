//! History, quiz and timer settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use studyverse_core::{Difficulty, HISTORY_CAPACITY, QuestionCount, QuestionType};

use crate::errors::{Result, SettingsError};

/// History list sizes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    /// Entries kept per feature list.
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: HISTORY_CAPACITY,
        }
    }
}

/// Defaults applied when a quiz request leaves settings unset.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizSettings {
    /// Default difficulty.
    pub difficulty: Difficulty,
    /// Default number of questions.
    pub question_count: u8,
    /// Default question style.
    pub question_type: QuestionType,
}

impl QuizSettings {
    /// Validated question count.
    pub fn question_count(&self) -> Result<QuestionCount> {
        QuestionCount::new(self.question_count)
            .map_err(|e| SettingsError::InvalidValue(format!("quiz.questionCount: {e}")))
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            question_count: 5,
            question_type: QuestionType::default(),
        }
    }
}

/// Focus timer settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    /// Session length in minutes.
    pub session_minutes: u64,
}

impl TimerSettings {
    /// Session length as a [`Duration`].
    pub fn session(&self) -> Duration {
        Duration::from_secs(self.session_minutes * 60)
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            session_minutes: 25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_defaults_match_core() {
        let quiz = QuizSettings::default();
        assert_eq!(quiz.difficulty, Difficulty::Medium);
        assert_eq!(quiz.question_type, QuestionType::OneMark);
        assert_eq!(quiz.question_count().unwrap().get(), 5);
    }

    #[test]
    fn quiz_type_uses_mark_labels() {
        let quiz: QuizSettings =
            serde_json::from_str(r#"{"questionType": "3M", "difficulty": "hard"}"#).unwrap();
        assert_eq!(quiz.question_type, QuestionType::ThreeMark);
        assert_eq!(quiz.difficulty, Difficulty::Hard);
    }

    #[test]
    fn timer_session_duration() {
        assert_eq!(TimerSettings::default().session(), Duration::from_secs(1500));
    }
}
