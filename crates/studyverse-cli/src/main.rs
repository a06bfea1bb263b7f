//! # studyverse
//!
//! Terminal host for StudyVerse. Loads settings, installs logging, builds the
//! Gemini backend and drives a single [`StudySession`] for one command.

#![deny(unsafe_code)]

mod args;
mod interactive;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use studyverse_core::StudyContext;
use studyverse_llm::{GeminiBackend, GeminiConfig};
use studyverse_runtime::{SessionConfig, StudySession};
use studyverse_settings::StudyverseSettings;

use crate::args::{Cli, Command};

fn load_settings(cli: &Cli) -> Result<StudyverseSettings> {
    match &cli.settings {
        Some(path) => studyverse_settings::load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        // the default file is optional
        None => Ok(studyverse_settings::load_settings().unwrap_or_default()),
    }
}

fn build_session(settings: &StudyverseSettings) -> Result<StudySession> {
    let api_key = studyverse_settings::require_api_key()?;
    let config = GeminiConfig::new(api_key)
        .with_base_url(settings.api.base_url.clone())
        .with_timeout(settings.api.timeout());
    let backend = GeminiBackend::new(config).context("Failed to build Gemini client")?;
    let session_config =
        SessionConfig::from_settings(settings).context("Invalid session settings")?;
    Ok(StudySession::new(Arc::new(backend), session_config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(&cli)?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    studyverse_core::logging::init_subscriber(&level);
    tracing::debug!(command = ?cli.command, "starting");

    match &cli.command {
        Command::Timer { minutes } => {
            let session = minutes.map_or_else(
                || settings.timer.session(),
                |m| Duration::from_secs(m * 60),
            );
            interactive::run_timer(session).await
        }
        Command::Summarize(ctx) => {
            let context = ctx.to_context(StudyContext::sample_summary)?;
            let mut study = build_session(&settings)?;
            let summary = study.summarize(&context).await?;
            println!("{summary}");
            Ok(())
        }
        Command::Outline(ctx) => {
            let context = ctx.to_context(StudyContext::sample_outline)?;
            let mut study = build_session(&settings)?;
            let outline = study.generate_outline(&context).await?;
            println!("{outline}");
            Ok(())
        }
        Command::Quiz(ctx) => {
            let context = ctx.to_context(StudyContext::sample_quiz)?;
            let mut study = build_session(&settings)?;
            interactive::run_quiz(&mut study, &context).await
        }
        Command::Tutor(ctx) => {
            let context = ctx.to_context(StudyContext::new)?;
            let mut study = build_session(&settings)?;
            interactive::run_tutor(&mut study, &context).await
        }
        Command::Listen { text, out, context } => {
            let context = context.to_context(StudyContext::sample_summary)?;
            let mut study = build_session(&settings)?;
            let text = match text {
                Some(text) => text.clone(),
                None => study.summarize(&context).await?,
            };
            let audio = study.listen(&text).await?;
            std::fs::write(out, audio.to_le_bytes())
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!(
                "Wrote {:.1}s of {} Hz mono PCM to {}",
                audio.duration().as_secs_f64(),
                audio.sample_rate(),
                out.display()
            );
            Ok(())
        }
    }
}
