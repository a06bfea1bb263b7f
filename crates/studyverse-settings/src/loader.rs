//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`StudyverseSettings::default()`]
//! 2. If `~/.studyverse/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use studyverse_core::HISTORY_CAPACITY;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::StudyverseSettings;

/// Environment variables checked for the Gemini API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Resolve the path to the settings file (`~/.studyverse/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".studyverse").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<StudyverseSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults. Invalid JSON or an unusable value is an
/// error.
pub fn load_settings_from_path(path: &Path) -> Result<StudyverseSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<StudyverseSettings> {
    let defaults = serde_json::to_value(StudyverseSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `STUDYVERSE_*` environment variable overrides.
///
/// Invalid values are logged and ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut StudyverseSettings) {
    apply_overrides_with(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides_with<F>(settings: &mut StudyverseSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    // ── API settings ────────────────────────────────────────────────
    if let Some(v) = env.string("STUDYVERSE_BASE_URL") {
        settings.api.base_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = env.string("STUDYVERSE_TEXT_MODEL") {
        settings.api.text_model = v;
    }
    if let Some(v) = env.string("STUDYVERSE_TTS_MODEL") {
        settings.api.tts_model = v;
    }
    if let Some(v) = env.string("STUDYVERSE_VOICE") {
        settings.api.voice_name = v;
    }
    if let Some(v) = env.u64("STUDYVERSE_TIMEOUT_MS", 1000, 600_000) {
        settings.api.timeout_ms = v;
    }

    // ── Session settings ────────────────────────────────────────────
    if let Some(v) = env.usize("STUDYVERSE_HISTORY_CAPACITY", 1, HISTORY_CAPACITY) {
        settings.history.capacity = v;
    }
    if let Some(v) = env.string("STUDYVERSE_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

/// Read the Gemini API key from the environment.
pub fn resolve_api_key() -> Option<String> {
    resolve_api_key_with(|name| std::env::var(name).ok())
}

/// Read the Gemini API key from an arbitrary variable lookup.
pub fn resolve_api_key_with<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
}

/// Read the Gemini API key, failing with [`SettingsError::MissingApiKey`].
pub fn require_api_key() -> Result<String> {
    require_api_key_with(|name| std::env::var(name).ok())
}

/// [`require_api_key`] over an arbitrary variable lookup.
pub fn require_api_key_with<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    resolve_api_key_with(lookup).ok_or(SettingsError::MissingApiKey)
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn u64(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        let val = (self.lookup)(name)?;
        let result = parse_u64_range(&val, min, max);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
        }
        result
    }

    fn usize(&self, name: &str, min: usize, max: usize) -> Option<usize> {
        let val = (self.lookup)(name)?;
        let result = parse_usize_range(&val, min, max);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
