//! Task prompt templates.
//!
//! Each one-shot task prompt is `<context preamble><task instruction><language
//! directive>`. The tutor prompt is a system instruction with the preamble
//! embedded after the persona sentence.

use studyverse_core::{LanguageScope, StudyContext, compile_context_prompt, language_directive};

/// Summary task instruction.
pub const SUMMARY_TASK: &str = "Generate a detailed summary based on the provided context. Focus on the essential ideas, key points, and definitions related to the topic. Present the summary in a concise, easy-to-understand format using markdown (headings, bold text, and bullet points).";

/// Essay outline task instruction.
pub const OUTLINE_TASK: &str = "Generate a structured and detailed essay outline for the topic specified in the context. Include a thesis statement, main points with supporting details, and a conclusion. Format the output using markdown.";

/// Tutor persona opening.
pub const TUTOR_PERSONA: &str = "You are a friendly and encouraging AI Tutor. ";

/// Tutor behaviour guidance, placed after the context preamble.
pub const TUTOR_GUIDANCE: &str = "Your goal is to help students understand complex topics. Answer questions clearly, provide examples, and adapt your language to be easily understood. If a student seems stuck, offer hints or ask guiding questions. Keep your responses concise and focused on the student's query.";

/// Prefix of the narration prompt.
pub const NARRATION_PREFIX: &str = "Here is the summary: ";

/// Summary prompt.
pub fn summary_prompt(context: &StudyContext) -> String {
    format!(
        "{}{SUMMARY_TASK}{}",
        compile_context_prompt(context),
        language_directive(context, LanguageScope::Response)
    )
}

/// Quiz prompt with count, difficulty and question-style directives.
pub fn quiz_prompt(context: &StudyContext) -> String {
    format!(
        "{}Based on the provided context, generate {} practice questions of {} difficulty. Each question should be a {}. Each question must have exactly 4 options.{}",
        compile_context_prompt(context),
        context.effective_question_count(),
        context.effective_difficulty(),
        context.effective_question_type().style_text(),
        language_directive(context, LanguageScope::Quiz)
    )
}

/// Essay outline prompt.
pub fn outline_prompt(context: &StudyContext) -> String {
    format!(
        "{}{OUTLINE_TASK}{}",
        compile_context_prompt(context),
        language_directive(context, LanguageScope::Response)
    )
}

/// Tutor system instruction.
pub fn tutor_system_instruction(context: &StudyContext) -> String {
    format!(
        "{TUTOR_PERSONA}{}{TUTOR_GUIDANCE}{}",
        compile_context_prompt(context),
        language_directive(context, LanguageScope::Conversation)
    )
}

/// Narration prompt for speech synthesis.
pub fn narration_prompt(text: &str) -> String {
    format!("{NARRATION_PREFIX}{text}")
}
