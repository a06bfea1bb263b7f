//! Quiz questions and quiz progress.
//!
//! [`QuizQuestion`] is decoded from backend JSON through a validating step
//! that fails closed: a missing or mistyped field, or an option count other
//! than four, rejects the whole payload.
//!
//! Whether `correct_answer` is one of the `options` is deliberately not
//! checked. The backend is instructed to uphold it; if it does not, the
//! question simply can never be answered correctly.
//!
//! [`QuizRun`] tracks an interactive attempt: current question, submitted
//! answers, and the final score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{StudyError, StudyResult};

/// Number of options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Wire shape of a quiz item before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuizQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
}

/// One multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawQuizQuestion")]
pub struct QuizQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
}

impl TryFrom<RawQuizQuestion> for QuizQuestion {
    type Error = StudyError;

    fn try_from(raw: RawQuizQuestion) -> Result<Self, Self::Error> {
        Self::new(raw.question, raw.options, raw.correct_answer, raw.explanation)
    }
}

impl QuizQuestion {
    /// Build a question, requiring exactly four options.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> StudyResult<Self> {
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(StudyError::generation(format!(
                "quiz question has {} options, expected {OPTIONS_PER_QUESTION}",
                options.len()
            )));
        }
        Ok(Self {
            question: question.into(),
            options,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
        })
    }

    /// Question text.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The four options, in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The answer the backend marked as correct.
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Why the correct answer is correct.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether `correct_answer` is one of the options.
    pub fn answer_in_options(&self) -> bool {
        self.options.iter().any(|o| *o == self.correct_answer)
    }

    /// Whether `answer` matches the correct answer exactly.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// Decode a JSON array of quiz items.
pub fn parse_quiz_questions(json: &str) -> Result<Vec<QuizQuestion>, serde_json::Error> {
    serde_json::from_str(json.trim())
}

/// Stage of a quiz attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizPhase {
    /// Questions are being answered.
    Active,
    /// All questions answered; score is final.
    Results,
}

/// Feedback after submitting an answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerFeedback {
    /// Whether the submitted answer was correct.
    pub correct: bool,
    /// The correct answer.
    pub correct_answer: String,
    /// Explanation of the correct answer.
    pub explanation: String,
}

/// Final or running score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    /// Correct answers so far.
    pub correct: usize,
    /// Number of questions in the quiz.
    pub total: usize,
}

impl QuizScore {
    /// Score as a whole percentage, rounded half up. Zero for an empty quiz.
    pub fn percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.correct * 100 + self.total / 2) / self.total
    }
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

/// An interactive attempt at a generated quiz.
#[derive(Clone, Debug)]
pub struct QuizRun {
    questions: Vec<QuizQuestion>,
    current: usize,
    answers: Vec<String>,
    phase: QuizPhase,
}

impl QuizRun {
    /// Start a quiz at the first question.
    ///
    /// An empty question list is an [`StudyError::EmptyResult`]: the host
    /// should return to its configuration state.
    pub fn start(questions: Vec<QuizQuestion>) -> StudyResult<Self> {
        if questions.is_empty() {
            return Err(StudyError::empty_result(
                "Couldn't generate a quiz. The provided context might be insufficient.",
            ));
        }
        Ok(Self {
            questions,
            current: 0,
            answers: Vec::new(),
            phase: QuizPhase::Active,
        })
    }

    /// Current stage.
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Zero-based index of the question being shown.
    pub fn current_question_index(&self) -> usize {
        self.current
    }

    /// The question being shown, `None` once results are reached.
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::Active => self.questions.get(self.current),
            QuizPhase::Results => None,
        }
    }

    /// All questions.
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Submitted answers, in question order.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Whether the current question already has an answer.
    pub fn is_answered(&self) -> bool {
        self.answers.len() > self.current
    }

    /// Whether the current question is the last one.
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Record an answer for the current question.
    pub fn submit_answer(&mut self, option: &str) -> StudyResult<AnswerFeedback> {
        let question = self
            .current_question()
            .ok_or_else(|| StudyError::validation("The quiz is already finished."))?;
        if self.answers.len() > self.current {
            return Err(StudyError::validation(
                "This question has already been answered.",
            ));
        }
        if !question.options().iter().any(|o| o == option) {
            return Err(StudyError::validation("Please select one of the options."));
        }

        let feedback = AnswerFeedback {
            correct: question.is_correct(option),
            correct_answer: question.correct_answer().to_owned(),
            explanation: question.explanation().to_owned(),
        };
        self.answers.push(option.to_owned());
        Ok(feedback)
    }

    /// Advance to the next question, or to results after the last one.
    pub fn next_question(&mut self) -> StudyResult<QuizPhase> {
        if self.phase == QuizPhase::Results {
            return Ok(QuizPhase::Results);
        }
        if !self.is_answered() {
            return Err(StudyError::validation(
                "Answer the current question before moving on.",
            ));
        }
        if self.is_last_question() {
            self.phase = QuizPhase::Results;
        } else {
            self.current += 1;
        }
        Ok(self.phase)
    }

    /// Score over submitted answers.
    pub fn score(&self) -> QuizScore {
        let correct = self
            .answers
            .iter()
            .zip(&self.questions)
            .filter(|(answer, question)| question.is_correct(answer))
            .count();
        QuizScore {
            correct,
            total: self.questions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn question(n: usize, correct: &str) -> QuizQuestion {
        QuizQuestion::new(
            format!("Question {n}?"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
            format!("Because {correct}."),
        )
        .unwrap()
    }

    #[test]
    fn decodes_well_formed_payload() {
        let json = r#"
            [{"question":"What do plants absorb?","options":["CO2","O2","N2","He"],
              "correctAnswer":"CO2","explanation":"Used in photosynthesis."}]
        "#;
        let questions = parse_quiz_questions(json).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options().len(), 4);
        assert_eq!(questions[0].correct_answer(), "CO2");
        assert!(questions[0].answer_in_options());
    }

    #[test]
    fn rejects_missing_field() {
        let json = r#"[{"question":"Q","options":["a","b","c","d"],"correctAnswer":"a"}]"#;
        assert!(parse_quiz_questions(json).is_err());
    }

    #[test]
    fn rejects_mistyped_field() {
        let json = r#"[{"question":"Q","options":"a,b,c,d","correctAnswer":"a","explanation":"e"}]"#;
        assert!(parse_quiz_questions(json).is_err());
    }

    #[test]
    fn rejects_wrong_option_count() {
        let json = r#"[{"question":"Q","options":["a","b","c"],"correctAnswer":"a","explanation":"e"}]"#;
        let err = parse_quiz_questions(json).unwrap_err();
        assert!(err.to_string().contains("expected 4"));
    }

    #[test]
    fn rejects_non_array() {
        assert!(parse_quiz_questions(r#"{"questions":[]}"#).is_err());
        assert!(parse_quiz_questions("not json").is_err());
    }

    #[test]
    fn answer_outside_options_is_accepted_but_never_scores() {
        let json = r#"[{"question":"Q","options":["a","b","c","d"],"correctAnswer":"z","explanation":"e"}]"#;
        let questions = parse_quiz_questions(json).unwrap();
        assert!(!questions[0].answer_in_options());

        let mut run = QuizRun::start(questions).unwrap();
        let feedback = run.submit_answer("a").unwrap();
        assert!(!feedback.correct);
        assert_eq!(run.next_question().unwrap(), QuizPhase::Results);
        assert_eq!(run.score().correct, 0);
    }

    #[test]
    fn empty_quiz_is_empty_result() {
        assert_matches!(QuizRun::start(vec![]), Err(StudyError::EmptyResult { .. }));
    }

    #[test]
    fn full_run_scores_all_correct() {
        let mut run = QuizRun::start(vec![question(1, "A"), question(2, "B"), question(3, "C")])
            .unwrap();
        assert_eq!(run.current_question_index(), 0);
        assert_eq!(run.phase(), QuizPhase::Active);

        for expected in ["A", "B", "C"] {
            let feedback = run.submit_answer(expected).unwrap();
            assert!(feedback.correct);
            let _ = run.next_question().unwrap();
        }

        assert_eq!(run.phase(), QuizPhase::Results);
        assert!(run.current_question().is_none());
        let score = run.score();
        assert_eq!(score.to_string(), "3/3");
        assert_eq!(score.percentage(), 100);
    }

    #[test]
    fn mixed_answers_round_percentage() {
        let mut run = QuizRun::start(vec![question(1, "A"), question(2, "B"), question(3, "C")])
            .unwrap();
        for answer in ["A", "D", "D"] {
            let _ = run.submit_answer(answer).unwrap();
            let _ = run.next_question().unwrap();
        }
        let score = run.score();
        assert_eq!(score.correct, 1);
        assert_eq!(score.percentage(), 33);
    }

    #[test]
    fn cannot_answer_twice_or_skip() {
        let mut run = QuizRun::start(vec![question(1, "A"), question(2, "B")]).unwrap();
        assert_matches!(run.next_question(), Err(StudyError::Validation { .. }));
        let _ = run.submit_answer("B").unwrap();
        assert_matches!(run.submit_answer("A"), Err(StudyError::Validation { .. }));
        assert_eq!(run.next_question().unwrap(), QuizPhase::Active);
        assert_eq!(run.current_question_index(), 1);
    }

    #[test]
    fn rejects_answer_not_in_options() {
        let mut run = QuizRun::start(vec![question(1, "A")]).unwrap();
        assert_matches!(run.submit_answer("E"), Err(StudyError::Validation { .. }));
        assert!(!run.is_answered());
    }

    #[test]
    fn score_percentage_of_empty_is_zero() {
        let score = QuizScore {
            correct: 0,
            total: 0,
        };
        assert_eq!(score.percentage(), 0);
    }
}
