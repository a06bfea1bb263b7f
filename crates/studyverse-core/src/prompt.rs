//! Context preamble compiler.
//!
//! Renders a [`StudyContext`] into the natural-language preamble that is
//! prefixed to every task instruction. Field lines always appear in the same
//! order regardless of how the context was built:
//!
//! ```text
//! The following context has been provided:
//! Subject: Science
//! Topic/Chapter: Photosynthesis
//! Author: ...
//! Class/Grade: ...
//! Board/University: ...
//! Language: ...
//!
//! ---
//!
//! ```
//!
//! An empty context compiles to the empty string.

use crate::context::StudyContext;

/// Separator appended after the field lines.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// First line of a non-empty preamble.
pub const CONTEXT_HEADER: &str = "The following context has been provided:";

/// Render the context preamble.
pub fn compile_context_prompt(context: &StudyContext) -> String {
    let fields = [
        ("Subject", context.subject()),
        ("Topic/Chapter", context.chapter()),
        ("Author", context.author()),
        ("Class/Grade", context.class_name()),
        ("Board/University", context.board()),
        ("Language", context.language()),
    ];

    let lines: Vec<String> = fields
        .iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
        .collect();

    if lines.is_empty() {
        return String::new();
    }

    format!("{CONTEXT_HEADER}\n{}{CONTEXT_SEPARATOR}", lines.join("\n"))
}

/// What the language directive applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LanguageScope {
    /// A single free-text response (summary, outline).
    Response,
    /// Every part of a generated quiz.
    Quiz,
    /// A whole tutoring conversation.
    Conversation,
}

/// Render the optional "respond in <language>" suffix.
///
/// Empty when the context has no language.
pub fn language_directive(context: &StudyContext, scope: LanguageScope) -> String {
    let Some(language) = context.language() else {
        return String::new();
    };
    match scope {
        LanguageScope::Response => {
            format!("\n\nPlease generate the entire response in the {language} language.")
        }
        LanguageScope::Quiz => format!(
            "\n\nPlease generate all parts of the quiz (questions, options, correct answer, and explanation) in the {language} language."
        ),
        LanguageScope::Conversation => {
            format!("\n\nPlease conduct the entire conversation in the {language} language.")
        }
    }
}
