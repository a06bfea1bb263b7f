//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use studyverse_core::{Difficulty, QuestionCount, QuestionType, StudyContext};

/// AI study assistant: summaries, quizzes, essay outlines, tutoring and focus
/// sessions.
#[derive(Parser, Debug)]
#[command(name = "studyverse", version, about)]
pub struct Cli {
    /// Settings file (defaults to `~/.studyverse/settings.json`).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log filter, e.g. `info` or `studyverse_llm=debug`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Feature to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a Markdown summary of a chapter.
    Summarize(ContextArgs),
    /// Take an interactive multiple-choice quiz.
    Quiz(ContextArgs),
    /// Generate an essay outline for a topic.
    Outline(ContextArgs),
    /// Chat with the AI tutor. Enter `/quit` or end input to stop.
    Tutor(ContextArgs),
    /// Narrate text, or a fresh summary of the context, as raw PCM.
    Listen {
        /// Text to narrate; summarizes the context when omitted.
        #[arg(long)]
        text: Option<String>,

        /// Output file for 24 kHz mono s16le PCM.
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        context: ContextArgs,
    },
    /// Run a focus timer and report credited study time.
    Timer {
        /// Session length in minutes, 1-600 (overrides settings).
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=600))]
        minutes: Option<u64>,
    },
}

/// Study context flags shared by the generation commands.
#[derive(Args, Debug, Default)]
pub struct ContextArgs {
    /// Subject, e.g. "Science".
    #[arg(long)]
    pub subject: Option<String>,

    /// Chapter name or topic.
    #[arg(long)]
    pub chapter: Option<String>,

    /// Class or grade.
    #[arg(long = "class")]
    pub class_name: Option<String>,

    /// Board or university.
    #[arg(long)]
    pub board: Option<String>,

    /// Response language.
    #[arg(long)]
    pub language: Option<String>,

    /// Author of the studied text.
    #[arg(long)]
    pub author: Option<String>,

    /// Quiz difficulty: easy, medium or hard.
    #[arg(long, value_parser = parse_difficulty)]
    pub difficulty: Option<Difficulty>,

    /// Number of quiz questions (1-20).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub count: Option<u8>,

    /// Quiz question style: 1M, 2M, 3M or 4M.
    #[arg(long, value_parser = parse_question_type)]
    pub question_type: Option<QuestionType>,

    /// Start from the built-in sample context for the command.
    #[arg(long)]
    pub sample: bool,
}

fn parse_difficulty(value: &str) -> std::result::Result<Difficulty, String> {
    Difficulty::parse(value).ok_or_else(|| format!("unknown difficulty `{value}`"))
}

fn parse_question_type(value: &str) -> std::result::Result<QuestionType, String> {
    QuestionType::parse(value).ok_or_else(|| format!("unknown question type `{value}`"))
}

impl ContextArgs {
    /// Build a context, layering explicit flags over `sample` when `--sample`
    /// is set.
    pub fn to_context(&self, sample: fn() -> StudyContext) -> Result<StudyContext> {
        let mut context = if self.sample {
            sample()
        } else {
            StudyContext::new()
        };
        let text_fields = [
            (&mut context.subject, &self.subject),
            (&mut context.chapter, &self.chapter),
            (&mut context.class_name, &self.class_name),
            (&mut context.board, &self.board),
            (&mut context.language, &self.language),
            (&mut context.author, &self.author),
        ];
        for (field, flag) in text_fields {
            if flag.is_some() {
                field.clone_from(flag);
            }
        }
        if let Some(difficulty) = self.difficulty {
            context.difficulty = Some(difficulty);
        }
        if let Some(count) = self.count {
            context.question_count =
                Some(QuestionCount::new(count).context("invalid question count")?);
        }
        if let Some(question_type) = self.question_type {
            context.question_type = Some(question_type);
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_sample() {
        let cli = Cli::try_parse_from([
            "studyverse",
            "quiz",
            "--sample",
            "--chapter",
            "Respiration",
            "--difficulty",
            "HARD",
            "--count",
            "7",
            "--question-type",
            "2m",
        ])
        .unwrap();
        let Command::Quiz(args) = cli.command else {
            panic!("expected quiz");
        };
        let context = args.to_context(StudyContext::sample_quiz).unwrap();
        assert_eq!(context.subject(), Some("Science"));
        assert_eq!(context.chapter(), Some("Respiration"));
        assert_eq!(context.difficulty, Some(Difficulty::Hard));
        assert_eq!(context.question_count.map(QuestionCount::get), Some(7));
        assert_eq!(context.question_type, Some(QuestionType::TwoMark));
    }

    #[test]
    fn count_out_of_range_is_rejected() {
        let result = Cli::try_parse_from(["studyverse", "quiz", "--count", "21"]);
        assert!(result.is_err());
    }

    #[test]
    fn timer_minutes_are_bounded() {
        let cli = Cli::try_parse_from(["studyverse", "timer", "--minutes", "600"]).unwrap();
        assert!(matches!(cli.command, Command::Timer { minutes: Some(600) }));
        assert!(Cli::try_parse_from(["studyverse", "timer", "--minutes", "0"]).is_err());
        assert!(Cli::try_parse_from(["studyverse", "timer", "--minutes", "601"]).is_err());
        let huge = u64::MAX.to_string();
        assert!(Cli::try_parse_from(["studyverse", "timer", "--minutes", huge.as_str()]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "studyverse",
            "listen",
            "--text",
            "hello",
            "--out",
            "hello.pcm",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Command::Listen { .. }));
    }

    #[test]
    fn empty_flags_build_empty_context() {
        let context = ContextArgs::default()
            .to_context(StudyContext::sample_summary)
            .unwrap();
        assert!(context.is_blank());
    }
}
