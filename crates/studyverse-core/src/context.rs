//! Study context: what the student is studying.
//!
//! A [`StudyContext`] is captured from the host's form and passed by reference
//! into every generation call. Every field is optional at capture time; each
//! feature enforces the subset it needs (see [`StudyContext::require_topic`]).
//! Whitespace-only strings are treated as absent.
//!
//! The JSON shape is camelCase (`className`, `questionCount`, …) and quiz
//! settings use the `"1M"`..`"4M"` labels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::StudyError;

/// Quiz difficulty directive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy questions.
    Easy,
    /// Medium questions.
    #[default]
    Medium,
    /// Hard questions.
    Hard,
}

impl Difficulty {
    /// Lowercase label used in prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parse a label (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mark-weight category of a quiz question.
///
/// A label for the intended answer depth, not a numeric score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    /// One-mark style.
    #[default]
    #[serde(rename = "1M")]
    OneMark,
    /// Two-mark style.
    #[serde(rename = "2M")]
    TwoMark,
    /// Three-mark style.
    #[serde(rename = "3M")]
    ThreeMark,
    /// Four-mark style.
    #[serde(rename = "4M")]
    FourMark,
}

impl QuestionType {
    /// Mark weight of the category.
    #[must_use]
    pub const fn marks(self) -> u8 {
        match self {
            Self::OneMark => 1,
            Self::TwoMark => 2,
            Self::ThreeMark => 3,
            Self::FourMark => 4,
        }
    }

    /// The `"1M"`..`"4M"` label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OneMark => "1M",
            Self::TwoMark => "2M",
            Self::ThreeMark => "3M",
            Self::FourMark => "4M",
        }
    }

    /// Prompt phrase, e.g. `"2 Mark style question"`.
    #[must_use]
    pub fn style_text(self) -> String {
        format!("{} Mark style question", self.marks())
    }

    /// Parse a `"1M"`..`"4M"` label (case-insensitive, `M` optional).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        match trimmed.strip_suffix(['M', 'm']).unwrap_or(trimmed) {
            "1" => Some(Self::OneMark),
            "2" => Some(Self::TwoMark),
            "3" => Some(Self::ThreeMark),
            "4" => Some(Self::FourMark),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of quiz questions to request, always within `1..=20`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QuestionCount(u8);

impl QuestionCount {
    /// Smallest allowed count.
    pub const MIN: u8 = 1;
    /// Largest allowed count.
    pub const MAX: u8 = 20;

    /// Create a count, rejecting values outside `1..=20`.
    pub fn new(value: u8) -> Result<Self, StudyError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(StudyError::validation(format!(
                "Number of questions must be between {} and {}.",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// The count as `usize`.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for QuestionCount {
    type Error = StudyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuestionCount> for u8 {
    fn from(count: QuestionCount) -> Self {
        count.0
    }
}

impl fmt::Display for QuestionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured description of a study topic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyContext {
    /// Subject, e.g. `"Science"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Chapter name or topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    /// Class or grade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Board or university.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    /// Response language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Author of the studied text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Quiz difficulty (quiz only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Quiz length (quiz only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_count: Option<QuestionCount>,
    /// Quiz mark-weight category (quiz only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

impl StudyContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the chapter/topic.
    #[must_use]
    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    /// Set the class/grade.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set the board/university.
    #[must_use]
    pub fn with_board(mut self, board: impl Into<String>) -> Self {
        self.board = Some(board.into());
        self
    }

    /// Set the response language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the quiz difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set the quiz length.
    #[must_use]
    pub fn with_question_count(mut self, count: QuestionCount) -> Self {
        self.question_count = Some(count);
        self
    }

    /// Set the quiz mark-weight category.
    #[must_use]
    pub fn with_question_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = Some(question_type);
        self
    }

    /// Subject, if non-blank.
    pub fn subject(&self) -> Option<&str> {
        non_blank(self.subject.as_ref())
    }

    /// Chapter/topic, if non-blank.
    pub fn chapter(&self) -> Option<&str> {
        non_blank(self.chapter.as_ref())
    }

    /// Class/grade, if non-blank.
    pub fn class_name(&self) -> Option<&str> {
        non_blank(self.class_name.as_ref())
    }

    /// Board/university, if non-blank.
    pub fn board(&self) -> Option<&str> {
        non_blank(self.board.as_ref())
    }

    /// Language, if non-blank.
    pub fn language(&self) -> Option<&str> {
        non_blank(self.language.as_ref())
    }

    /// Author, if non-blank.
    pub fn author(&self) -> Option<&str> {
        non_blank(self.author.as_ref())
    }

    /// Difficulty, defaulting to medium.
    pub fn effective_difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }

    /// Question count, defaulting to 5.
    pub fn effective_question_count(&self) -> QuestionCount {
        self.question_count.unwrap_or_default()
    }

    /// Question type, defaulting to 1M.
    pub fn effective_question_type(&self) -> QuestionType {
        self.question_type.unwrap_or_default()
    }

    /// Whether no descriptive field is populated.
    pub fn is_blank(&self) -> bool {
        self.subject().is_none()
            && self.chapter().is_none()
            && self.class_name().is_none()
            && self.board().is_none()
            && self.language().is_none()
            && self.author().is_none()
    }

    /// Require `subject` and `chapter`, the minimum for summaries, quizzes
    /// and outlines.
    pub fn require_topic(&self) -> Result<(), StudyError> {
        match (self.subject(), self.chapter()) {
            (Some(_), Some(_)) => Ok(()),
            (None, Some(_)) => Err(StudyError::validation("Please enter a subject.")),
            (Some(_), None) => Err(StudyError::validation("Please enter a chapter/topic.")),
            (None, None) => Err(StudyError::validation(
                "Please enter at least a subject and a chapter/topic.",
            )),
        }
    }

    /// Fill blank class/board from profile defaults, keeping explicit values.
    pub fn fill_academic_defaults(&mut self, class_name: Option<&str>, board: Option<&str>) {
        if self.class_name().is_none() {
            if let Some(value) = class_name.filter(|v| !v.trim().is_empty()) {
                self.class_name = Some(value.to_owned());
            }
        }
        if self.board().is_none() {
            if let Some(value) = board.filter(|v| !v.trim().is_empty()) {
                self.board = Some(value.to_owned());
            }
        }
    }

    /// Sample context offered by the summarizer.
    #[must_use]
    pub fn sample_summary() -> Self {
        Self::new()
            .with_subject("History")
            .with_class_name("12th Grade")
            .with_chapter("The American Revolution")
            .with_author("John Doe")
            .with_board("AP")
            .with_language("English")
    }

    /// Sample context offered by the quiz generator.
    #[must_use]
    pub fn sample_quiz() -> Self {
        Self::new()
            .with_subject("Science")
            .with_class_name("8th Grade")
            .with_chapter("Photosynthesis")
            .with_board("State Board")
            .with_language("English")
            .with_difficulty(Difficulty::Easy)
            .with_question_count(QuestionCount(3))
            .with_question_type(QuestionType::OneMark)
    }

    /// Sample context offered by the essay outliner.
    #[must_use]
    pub fn sample_outline() -> Self {
        Self::new()
            .with_subject("Environmental Science")
            .with_class_name("University")
            .with_chapter("The Impact of Climate Change on Biodiversity")
            .with_board("College")
            .with_language("English")
    }
}
