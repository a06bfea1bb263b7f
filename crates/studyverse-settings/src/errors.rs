//! Settings error types.

use thiserror::Error;

/// Errors that can occur when loading or parsing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the settings file.
    #[error("failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A settings value was invalid (e.g., out of range).
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
    /// Neither `GEMINI_API_KEY` nor `API_KEY` holds a usable key.
    #[error("no Gemini API key found; set GEMINI_API_KEY or API_KEY")]
    MissingApiKey,
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_settings_document_is_a_json_error() {
        let json_err =
            serde_json::from_str::<serde_json::Value>(r#"{"history": {"capacity": }"#).unwrap_err();
        let err: SettingsError = json_err.into();
        assert!(matches!(err, SettingsError::Json(_)));
        assert!(err.to_string().starts_with("failed to parse settings JSON"));
    }

    #[test]
    fn question_count_out_of_range_names_the_key() {
        let err = SettingsError::InvalidValue(
            "quiz.questionCount: Number of questions must be between 1 and 20.".into(),
        );
        assert_eq!(
            err.to_string(),
            "invalid settings value: quiz.questionCount: Number of questions must be between 1 and 20."
        );
    }

    #[test]
    fn missing_api_key_names_both_variables() {
        let message = SettingsError::MissingApiKey.to_string();
        assert!(message.contains("GEMINI_API_KEY"));
        assert!(message.contains("API_KEY"));
    }

    #[test]
    fn unreadable_settings_file_is_an_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "settings.json");
        let err: SettingsError = io_err.into();
        assert!(matches!(err, SettingsError::Io(_)));
        assert!(err.to_string().contains("settings.json"));
    }
}
