//! Interactive commands reading from stdin.

use std::io::Write as _;
use std::time::Duration;

use anyhow::{Context, Result};
use studyverse_core::timer::format_mm_ss;
use studyverse_core::{QuizPhase, QuizQuestion, StudyContext, StudyTimer};
use studyverse_runtime::StudySession;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type InputLines = Lines<BufReader<Stdin>>;

fn input() -> InputLines {
    BufReader::new(tokio::io::stdin()).lines()
}

fn prompt(label: &str) -> Result<()> {
    print!("{label}");
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Resolve a typed answer to an option: a 1-based number or the option text.
fn pick_option<'a>(question: &'a QuizQuestion, input: &str) -> Option<&'a str> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return question
            .options()
            .get(n.checked_sub(1)?)
            .map(String::as_str);
    }
    question
        .options()
        .iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .map(String::as_str)
}

/// Generate a quiz and walk through it, offering a retake after the results.
pub async fn run_quiz(study: &mut StudySession, context: &StudyContext) -> Result<()> {
    let _ = study.generate_quiz(context).await?;
    let mut lines = input();

    loop {
        if !answer_questions(study, &mut lines).await? {
            return Ok(());
        }
        if let Some(score) = study.quiz_score() {
            println!("\nYou scored {score} ({}%).", score.percentage());
        }

        prompt("Retake this quiz? [y/N] ")?;
        let Some(line) = lines.next_line().await.context("Failed to read reply")? else {
            println!();
            return Ok(());
        };
        if !wants_retake(&line) {
            return Ok(());
        }
        let _ = study.retake_quiz(0)?;
    }
}

fn wants_retake(reply: &str) -> bool {
    matches!(reply.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Ask every remaining question. Returns `false` when input ends early.
async fn answer_questions(study: &mut StudySession, lines: &mut InputLines) -> Result<bool> {
    let total = study.quiz().map_or(0, |run| run.questions().len());

    while let Some(question) = study.quiz().and_then(|run| run.current_question()).cloned() {
        let index = study
            .quiz()
            .map_or(0, studyverse_core::QuizRun::current_question_index);
        println!("\nQuestion {} of {total}: {}", index + 1, question.question());
        for (i, option) in question.options().iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        let answer = loop {
            prompt("Your answer: ")?;
            let Some(line) = lines.next_line().await.context("Failed to read answer")? else {
                println!();
                return Ok(false);
            };
            match pick_option(&question, &line) {
                Some(option) => break option.to_owned(),
                None => println!("Pick 1-{} or type an option.", question.options().len()),
            }
        };

        let feedback = study.submit_answer(&answer)?;
        if feedback.correct {
            println!("Correct!");
        } else {
            println!("Incorrect. The answer is: {}", feedback.correct_answer);
        }
        println!("{}", feedback.explanation);

        if study.next_question()? == QuizPhase::Results {
            break;
        }
    }
    Ok(true)
}

/// Line-based tutor chat.
pub async fn run_tutor(study: &mut StudySession, context: &StudyContext) -> Result<()> {
    let _ = study.open_tutor(context);
    println!("AI Tutor: ask me anything about your studies. Type /quit to leave.");
    let mut lines = input();

    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await.context("Failed to read message")? else {
            break;
        };
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let reply = study.tutor_send(line).await?;
        println!("{}\n", reply.text);
    }

    if study.close_tutor() {
        tracing::info!("tutor conversation saved");
    }
    Ok(())
}

/// Count down one focus session, redrawing once per second.
pub async fn run_timer(session: Duration) -> Result<()> {
    let mut timer = StudyTimer::with_duration(session);
    timer.toggle();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // first tick completes immediately
    let _ = ticker.tick().await;

    loop {
        print!("\rFocus time remaining: {}", timer.format_mm_ss());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        tokio::select! {
            _ = ticker.tick() => {
                if let Some(credited) = timer.tick(1) {
                    println!(
                        "\rGreat job! Session complete. Added {} to your study time.",
                        format_mm_ss(credited)
                    );
                    return Ok(());
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                println!("\nTimer stopped at {}.", timer.format_mm_ss());
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> QuizQuestion {
        QuizQuestion::new(
            "Which gas?",
            vec!["Oxygen".into(), "Carbon dioxide".into(), "Nitrogen".into(), "Helium".into()],
            "Carbon dioxide",
            "Plants absorb it.",
        )
        .unwrap()
    }

    #[test]
    fn answers_by_number_or_text() {
        let q = question();
        assert_eq!(pick_option(&q, "2"), Some("Carbon dioxide"));
        assert_eq!(pick_option(&q, " helium "), Some("Helium"));
        assert_eq!(pick_option(&q, "0"), None);
        assert_eq!(pick_option(&q, "5"), None);
        assert_eq!(pick_option(&q, "Argon"), None);
    }

    #[test]
    fn retake_needs_explicit_yes() {
        assert!(wants_retake("y"));
        assert!(wants_retake(" YES\n"));
        assert!(!wants_retake(""));
        assert!(!wants_retake("n"));
        assert!(!wants_retake("maybe"));
    }
}
