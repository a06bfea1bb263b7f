//! Gemini `generateContent` request/response types.

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation contents.
    pub contents: Vec<GeminiContent>,
    /// System instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    /// Generation config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Content message in Gemini API format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// The role (`user` or `model`).
    pub role: String,
    /// Content parts.
    pub parts: Vec<GeminiPart>,
}

/// A content part in a Gemini message.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    /// Text content.
    Text {
        /// The text content.
        text: String,
        /// Whether this is a thinking block.
        #[serde(skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    /// Inline binary data (speech output).
    InlineData {
        /// The inline data details.
        #[serde(rename = "inlineData")]
        inline_data: InlineDataContent,
    },
    /// Any other part kind; ignored.
    Other(serde_json::Value),
}

impl GeminiPart {
    /// Plain text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            thought: None,
        }
    }
}

/// Inline binary data.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDataContent {
    /// MIME type (e.g., `audio/L16;codec=pcm;rate=24000`).
    pub mime_type: String,
    /// Base64-encoded data.
    pub data: String,
}

/// System instruction for the Gemini API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemInstruction {
    /// Parts containing the system prompt.
    pub parts: Vec<SystemPart>,
}

/// A part of a system instruction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemPart {
    /// Text content.
    pub text: String,
}

/// Generation config for the Gemini API.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Output MIME type, e.g. `application/json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Schema constraining JSON output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// Output modalities, e.g. `["AUDIO"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    /// Speech synthesis settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

/// Speech synthesis settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    /// Voice selection.
    pub voice_config: VoiceConfig,
}

/// Voice selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    /// Prebuilt voice.
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

/// A named prebuilt voice.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    /// Voice name, e.g. `Kore`.
    pub voice_name: String,
}

/// Response body of `generateContent`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Response candidates.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Prompt-level feedback (blocking).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    /// Token usage metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    /// Error embedded in a 200 response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GeminiApiError>,
}

/// A response candidate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// The content of this candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<GeminiCandidateContent>,
    /// Finish reason (e.g., `STOP`, `MAX_TOKENS`, `SAFETY`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Content inside a candidate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeminiCandidateContent {
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
    /// The role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Prompt-level feedback.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token usage metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Prompt (input) token count.
    #[serde(default)]
    pub prompt_token_count: u64,
    /// Candidates (output) token count.
    #[serde(default)]
    pub candidates_token_count: u64,
    /// Total token count.
    #[serde(default)]
    pub total_token_count: u64,
}

/// Error object in a Gemini response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeminiApiError {
    /// HTTP-style error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Status string, e.g. `INVALID_ARGUMENT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_decode_by_shape() {
        let parts: Vec<GeminiPart> = serde_json::from_value(serde_json::json!([
            {"text": "hello"},
            {"inlineData": {"mimeType": "audio/L16", "data": "AAA="}},
            {"functionCall": {"name": "x", "args": {}}}
        ]))
        .unwrap();
        assert!(matches!(&parts[0], GeminiPart::Text { text, .. } if text == "hello"));
        assert!(matches!(&parts[1], GeminiPart::InlineData { inline_data } if inline_data.data == "AAA="));
        assert!(matches!(&parts[2], GeminiPart::Other(_)));
    }

    #[test]
    fn generation_config_omits_unset_fields() {
        let config = GenerationConfig {
            response_mime_type: Some("application/json".into()),
            ..GenerationConfig::default()
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json, serde_json::json!({"responseMimeType": "application/json"}));
    }

    #[test]
    fn speech_config_shape() {
        let config = SpeechConfig {
            voice_config: VoiceConfig {
                prebuilt_voice_config: PrebuiltVoiceConfig {
                    voice_name: "Kore".into(),
                },
            },
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"], "Kore");
    }

    #[test]
    fn response_without_candidates() {
        let resp: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(resp.candidates.is_empty());
        assert_eq!(
            resp.prompt_feedback.and_then(|f| f.block_reason).as_deref(),
            Some("SAFETY")
        );
    }
}
