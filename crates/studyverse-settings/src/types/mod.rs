//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! JSON document deserializes with defaults for the missing fields.

mod api;
mod study;

pub use api::*;
pub use study::*;

use serde::{Deserialize, Serialize};
use studyverse_core::HISTORY_CAPACITY;

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "api": { "textModel": "gemini-2.5-pro" },
///   "history": { "capacity": 5 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyverseSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Generation backend settings.
    pub api: GeminiSettings,
    /// History list sizes.
    pub history: HistorySettings,
    /// Quiz defaults.
    pub quiz: QuizSettings,
    /// Focus timer.
    pub timer: TimerSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for StudyverseSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "studyverse".to_string(),
            api: GeminiSettings::default(),
            history: HistorySettings::default(),
            quiz: QuizSettings::default(),
            timer: TimerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl StudyverseSettings {
    /// Reject values that deserialize but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if !(1..=HISTORY_CAPACITY).contains(&self.history.capacity) {
            return Err(SettingsError::InvalidValue(format!(
                "history.capacity must be between 1 and {HISTORY_CAPACITY}"
            )));
        }
        if self.timer.session_minutes == 0 {
            return Err(SettingsError::InvalidValue(
                "timer.sessionMinutes must be at least 1".into(),
            ));
        }
        if self.api.timeout_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "api.timeoutMs must be at least 1".into(),
            ));
        }
        let _ = self.quiz.question_count()?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
