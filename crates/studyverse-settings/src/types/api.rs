//! Generation backend settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini connection and model selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiSettings {
    /// API base URL (without trailing slash).
    pub base_url: String,
    /// Model used for summaries, quizzes, outlines and tutoring.
    pub text_model: String,
    /// Model used for speech synthesis.
    pub tts_model: String,
    /// Prebuilt voice for narration.
    pub voice_name: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl GeminiSettings {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice_name: "Kore".to_string(),
            timeout_ms: 60_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override() {
        let settings: GeminiSettings =
            serde_json::from_str(r#"{"voiceName": "Puck", "timeoutMs": 5000}"#).unwrap();
        assert_eq!(settings.voice_name, "Puck");
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.text_model, "gemini-2.5-flash");
    }
}
