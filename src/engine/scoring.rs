// src/engine/scoring.rs

use std::collections::HashSet;

use crate::{
    config::MAX_REPORTED_SECONDS,
    models::{
        quiz::Quiz,
        result::{AnswerRecord, ScoringResult, SubmittedAnswer},
    },
};

/// Scores one submission against its quiz.
///
/// The percentage is taken over every question in the quiz, not only the
/// answered ones, so skipping hard questions cannot inflate the score.
/// Answers naming a question the quiz does not contain are ignored, and only
/// the first answer to each question counts.
///
/// Callers must reject quizzes without questions before scoring; such a quiz
/// scores 0 here.
pub fn score(
    user_id: i64,
    quiz: &Quiz,
    answers: &[SubmittedAnswer],
    total_time_spent: Option<f64>,
) -> ScoringResult {
    let mut seen = HashSet::new();
    let records: Vec<AnswerRecord> = answers
        .iter()
        .filter_map(|submitted| {
            let Some(question) = quiz.question(submitted.question_id) else {
                tracing::debug!(
                    quiz_id = quiz.id,
                    question_id = submitted.question_id,
                    "Skipping answer for unknown question"
                );
                return None;
            };
            if !seen.insert(question.id) {
                tracing::debug!(
                    quiz_id = quiz.id,
                    question_id = question.id,
                    "Skipping repeated answer"
                );
                return None;
            }
            Some(AnswerRecord {
                question_id: question.id,
                user_answer: submitted.answer.clone(),
                // Strict string matching
                is_correct: submitted.answer == question.correct_answer,
                time_taken: reported_seconds(submitted.time_taken).unwrap_or(0.0),
            })
        })
        .collect();

    let total_questions = quiz.questions.len() as i64;
    let answered_questions = records.len() as i64;
    let correct_answers = records.iter().filter(|r| r.is_correct).count() as i64;
    let score = percentage(correct_answers, total_questions);

    ScoringResult {
        user_id,
        quiz_id: quiz.id,
        score,
        total_questions,
        answered_questions,
        correct_answers,
        accuracy: format!("{}%", score),
        speed: speed(answered_questions, total_time_spent),
        time_spent: time_spent_minutes(total_time_spent),
        answers: records,
    }
}

/// A client-reported duration, if usable. Values above a day are capped.
fn reported_seconds(seconds: Option<f64>) -> Option<f64> {
    seconds
        .filter(|s| s.is_finite() && *s > 0.0)
        .map(|s| s.min(MAX_REPORTED_SECONDS))
}

fn percentage(correct: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    correct * 100 / total
}

/// Questions answered per minute, formatted for display.
pub fn speed(answered: i64, total_seconds: Option<f64>) -> String {
    match reported_seconds(total_seconds) {
        Some(seconds) => format!("{:.2} questions/minute", answered as f64 / (seconds / 60.0)),
        None => "0 questions/minute".to_string(),
    }
}

/// Whole minutes spent, rounded up and capped at one day. Missing or
/// non-positive input counts as one minute.
pub fn time_spent_minutes(total_seconds: Option<f64>) -> i64 {
    match reported_seconds(total_seconds) {
        Some(seconds) => (seconds / 60.0).ceil() as i64,
        None => 1,
    }
}
