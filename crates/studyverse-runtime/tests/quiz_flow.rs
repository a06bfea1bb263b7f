//! End-to-end study flow against a scripted backend.

#![allow(missing_docs, unused_results)]

use std::sync::Arc;

use serde_json::json;
use studyverse_core::{ChatRole, QuizPhase, StudyContext};
use studyverse_llm::{MockBackend, ResponseShape};
use studyverse_runtime::{SessionConfig, StudySession};

fn photosynthesis_quiz() -> String {
    json!([
        {
            "question": "What gas do plants absorb during photosynthesis?",
            "options": ["Oxygen", "Carbon dioxide", "Nitrogen", "Helium"],
            "correctAnswer": "Carbon dioxide",
            "explanation": "Plants take in carbon dioxide and release oxygen."
        },
        {
            "question": "Which pigment captures light energy?",
            "options": ["Chlorophyll", "Melanin", "Keratin", "Hemoglobin"],
            "correctAnswer": "Chlorophyll",
            "explanation": "Chlorophyll absorbs mostly red and blue light."
        },
        {
            "question": "Where in the cell does photosynthesis happen?",
            "options": ["Nucleus", "Mitochondria", "Chloroplast", "Ribosome"],
            "correctAnswer": "Chloroplast",
            "explanation": "Chloroplasts contain the photosynthetic machinery."
        }
    ])
    .to_string()
}

#[tokio::test]
async fn sample_quiz_answered_correctly_scores_full_marks() {
    let backend = Arc::new(MockBackend::new().with_text(photosynthesis_quiz()));
    let mut study = StudySession::new(backend.clone(), SessionConfig::default());

    let run = study
        .generate_quiz(&StudyContext::sample_quiz())
        .await
        .unwrap();
    assert_eq!(run.questions().len(), 3);
    assert_eq!(run.current_question_index(), 0);
    assert!(run.questions().iter().all(|q| q.options().len() == 4));

    let request = backend.last_request().unwrap();
    let prompt = &request.contents[0].text;
    assert!(prompt.contains("Subject: Science"));
    assert!(prompt.contains("Topic/Chapter: Photosynthesis"));
    assert!(prompt.contains("generate 3 practice questions of easy difficulty"));
    assert!(prompt.contains("1 Mark style question"));
    assert!(matches!(request.response, ResponseShape::Json { .. }));

    loop {
        let answer = study
            .quiz()
            .and_then(|run| run.current_question())
            .map(|q| q.correct_answer().to_owned())
            .unwrap();
        let feedback = study.submit_answer(&answer).unwrap();
        assert!(feedback.correct);
        if study.next_question().unwrap() == QuizPhase::Results {
            break;
        }
    }

    let score = study.quiz_score().unwrap();
    assert_eq!(score.to_string(), "3/3");
    assert_eq!(score.percentage(), 100);
    assert_eq!(study.dashboard().counts.quizzes, 1);
}

#[tokio::test]
async fn tutor_session_lands_in_history_only_when_used() {
    let backend = Arc::new(MockBackend::new().with_text("Plants turn light into sugar."));
    let mut study = StudySession::new(backend, SessionConfig::default());

    study.open_tutor(&StudyContext::new());
    assert!(!study.close_tutor());
    assert_eq!(study.dashboard().counts.tutor_conversations, 0);

    study.open_tutor(&StudyContext::sample_quiz());
    let reply = study
        .tutor_send("Can you explain photosynthesis in simple terms?")
        .await
        .unwrap();
    assert_eq!(reply.role, ChatRole::Model);
    assert!(study.close_tutor());

    let counts = study.dashboard().counts;
    assert_eq!(counts.tutor_conversations, 1);
    assert_eq!(counts.summaries, 0);
}

#[tokio::test]
async fn history_keeps_ten_most_recent_summaries() {
    let backend = Arc::new(MockBackend::new());
    for i in 1..=11 {
        backend.push(studyverse_llm::mock::MockReply::Ok(
            studyverse_llm::GenerateResponse::text(format!("summary {i}")),
        ));
    }
    let mut study = StudySession::new(backend, SessionConfig::default());
    for _ in 0..11 {
        study
            .summarize(&StudyContext::sample_summary())
            .await
            .unwrap();
    }

    let summaries: Vec<_> = study
        .history()
        .summaries()
        .iter()
        .map(|r| r.summary.clone())
        .collect();
    assert_eq!(summaries.len(), 10);
    assert_eq!(summaries[0], "summary 11");
    assert_eq!(summaries[9], "summary 2");
}

#[tokio::test]
async fn larger_configured_capacity_still_keeps_ten() {
    let backend = Arc::new(MockBackend::new());
    for i in 1..=15 {
        backend.push(studyverse_llm::mock::MockReply::Ok(
            studyverse_llm::GenerateResponse::text(format!("summary {i}")),
        ));
    }
    let config = SessionConfig {
        history_capacity: 20,
        ..SessionConfig::default()
    };
    let mut study = StudySession::new(backend, config);
    for _ in 0..15 {
        study
            .summarize(&StudyContext::sample_summary())
            .await
            .unwrap();
    }

    let summaries = study.history().summaries();
    assert_eq!(summaries.count(), 10);
    assert_eq!(summaries.latest().unwrap().summary, "summary 15");
}

#[tokio::test]
async fn finished_quiz_can_be_retaken_from_history() {
    let backend = Arc::new(MockBackend::new().with_text(photosynthesis_quiz()));
    let mut study = StudySession::new(backend.clone(), SessionConfig::default());
    study
        .generate_quiz(&StudyContext::sample_quiz())
        .await
        .unwrap();
    loop {
        let first = study
            .quiz()
            .and_then(|run| run.current_question())
            .map(|q| q.options()[0].clone())
            .unwrap();
        study.submit_answer(&first).unwrap();
        if study.next_question().unwrap() == QuizPhase::Results {
            break;
        }
    }
    assert_eq!(study.quiz_score().unwrap().to_string(), "1/3");

    let run = study.retake_quiz(0).unwrap();
    assert_eq!(run.current_question_index(), 0);
    assert!(run.answers().is_empty());
    assert_eq!(run.phase(), QuizPhase::Active);
    assert_eq!(backend.call_count(), 1);
}
