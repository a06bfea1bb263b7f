//! # studyverse-settings
//!
//! Layered configuration for StudyVerse.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`StudyverseSettings::default()`]
//! 2. **User file**: `~/.studyverse/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `STUDYVERSE_*` overrides (highest priority)
//!
//! The Gemini API key is never part of the settings document. It is read from
//! `GEMINI_API_KEY` (or `API_KEY`) by [`resolve_api_key`], or by
//! [`require_api_key`] when a missing key should fail the command.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    deep_merge, load_settings, load_settings_from_path, require_api_key, resolve_api_key,
    settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
