//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use studyverse_core::{ChatRole, ChatTurn};
use tracing::{debug, error, info, instrument, warn};

use super::types::{
    GeminiContent, GeminiPart, GeminiRequest, GenerateContentResponse, GenerationConfig,
    PrebuiltVoiceConfig, SpeechConfig, SystemInstruction, SystemPart, VoiceConfig,
};
use crate::backend::{
    BackendError, BackendResult, GenerateRequest, GenerateResponse, GenerationBackend,
    InlineAudio, ResponseShape,
};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini connection configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// API base URL (without trailing slash).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Config for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Gemini backend over HTTP.
pub struct GeminiBackend {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a backend with its own HTTP client using the configured timeout.
    pub fn new(config: GeminiConfig) -> BackendResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a backend with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        info!(base_url = %config.base_url, "Gemini backend initialized");
        Self { config, client }
    }

    fn get_api_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.base_url)
    }

    fn build_headers(&self) -> BackendResult<HeaderMap> {
        if self.config.api_key.trim().is_empty() {
            return Err(BackendError::Auth {
                message: "no Gemini API key configured".into(),
            });
        }
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.config.api_key).map_err(|_| BackendError::Auth {
            message: "API key contains invalid header characters".into(),
        })?;
        let _ = headers.insert("x-goog-api-key", key);
        Ok(headers)
    }
}

/// Map a transcript into Gemini contents.
fn convert_turns(turns: &[ChatTurn]) -> Vec<GeminiContent> {
    turns
        .iter()
        .map(|turn| GeminiContent {
            role: match turn.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            }
            .to_string(),
            parts: vec![GeminiPart::text(turn.text.clone())],
        })
        .collect()
}

fn build_generation_config(shape: &ResponseShape) -> Option<GenerationConfig> {
    match shape {
        ResponseShape::Text => None,
        ResponseShape::Json { schema } => Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(schema.clone()),
            ..GenerationConfig::default()
        }),
        ResponseShape::Audio { voice } => Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".into()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.clone(),
                    },
                },
            }),
            ..GenerationConfig::default()
        }),
    }
}

/// Build the `generateContent` body for a request.
fn build_request_body(request: &GenerateRequest) -> GeminiRequest {
    GeminiRequest {
        contents: convert_turns(&request.contents),
        system_instruction: request
            .system_instruction
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|text| SystemInstruction {
                parts: vec![SystemPart { text: text.clone() }],
            }),
        generation_config: build_generation_config(&request.response),
    }
}

/// Pull text and inline audio out of the first candidate.
fn extract_response(response: GenerateContentResponse) -> BackendResult<GenerateResponse> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response.prompt_feedback.and_then(|f| f.block_reason);
        return Err(BackendError::EmptyCandidate { reason });
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let mut text = String::new();
    let mut audio = None;
    for part in parts {
        match part {
            GeminiPart::Text { text: t, thought } => {
                if thought != Some(true) {
                    text.push_str(&t);
                }
            }
            GeminiPart::InlineData { inline_data } => {
                if audio.is_none() {
                    audio = Some(InlineAudio {
                        mime_type: inline_data.mime_type,
                        data: inline_data.data,
                    });
                }
            }
            GeminiPart::Other(_) => {}
        }
    }

    if text.is_empty() && audio.is_none() {
        return Err(BackendError::EmptyCandidate {
            reason: candidate.finish_reason,
        });
    }

    Ok(GenerateResponse {
        text: (!text.is_empty()).then_some(text),
        audio,
    })
}

/// Parse an API error response body into `(message, status code)`.
fn parse_api_error(body: &str, status: u16) -> (String, Option<String>) {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &json["error"];
        let message = error["message"]
            .as_str()
            .unwrap_or("Unknown error")
            .to_string();
        let code = error["status"].as_str().map(String::from);
        (message, code)
    } else {
        (format!("HTTP {status}: {body}"), None)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip_all, fields(backend = "gemini", model = %request.model, shape = request.response.label()))]
    async fn generate(&self, request: &GenerateRequest) -> BackendResult<GenerateResponse> {
        let headers = self.build_headers()?;
        let body = build_request_body(request);

        debug!(
            turn_count = request.contents.len(),
            has_system_instruction = body.system_instruction.is_some(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.get_api_url(&request.model))
            .headers(headers)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if !status.is_success() {
            let (message, code) = parse_api_error(&body_text, status.as_u16());
            error!(
                status = status.as_u16(),
                code = code.as_deref().unwrap_or("unknown"),
                "Gemini API error"
            );
            if matches!(status.as_u16(), 401 | 403) {
                return Err(BackendError::Auth { message });
            }
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
                code,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body_text)?;
        if let Some(err) = parsed.error {
            warn!(code = ?err.code, status = ?err.status, "Gemini returned embedded error");
            return Err(BackendError::Api {
                status: err.code.unwrap_or(status.as_u16()),
                message: err.message,
                code: err.status,
            });
        }
        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "generateContent completed"
            );
        }

        extract_response(parsed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
