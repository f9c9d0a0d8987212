// src/models/result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::quiz::Question;

/// One answer in a submission payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub answer: String,

    /// Seconds spent on the question, as reported by the client.
    #[serde(default)]
    pub time_taken: Option<f64>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<SubmittedAnswer>,

    /// Total seconds spent on the attempt, as reported by the client.
    #[serde(default)]
    pub time_spent: Option<f64>,
}

/// Correctness record for one answered question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub user_answer: String,
    pub is_correct: bool,

    /// Seconds; 0 when the client did not report a time.
    pub time_taken: f64,
}

/// Output of the scoring engine, ready to be persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoringResult {
    pub user_id: i64,
    pub quiz_id: i64,

    /// 0..=100, floor-truncated.
    pub score: i64,
    pub total_questions: i64,
    pub answered_questions: i64,
    pub correct_answers: i64,
    pub accuracy: String,
    pub speed: String,

    /// Minutes, never below 1.
    pub time_spent: i64,
    pub answers: Vec<AnswerRecord>,
}

/// A stored attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub answered_questions: i64,
    pub correct_answers: i64,
    pub accuracy: String,
    pub speed: String,

    /// Minutes. Absent on rows recorded without time data.
    pub time_spent: Option<i64>,
    pub answers: Vec<AnswerRecord>,
    pub created_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn from_scoring(id: i64, result: ScoringResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: result.user_id,
            quiz_id: result.quiz_id,
            score: result.score,
            total_questions: result.total_questions,
            answered_questions: result.answered_questions,
            correct_answers: result.correct_answers,
            accuracy: result.accuracy,
            speed: result.speed,
            time_spent: Some(result.time_spent),
            answers: result.answers,
            created_at,
        }
    }
}

/// Response to a submission: the stored result plus the full questions with
/// correct answers and explanations for review.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    #[serde(flatten)]
    pub result: QuizResult,
    pub questions: Vec<Question>,
}

/// A stored result joined with the title of its quiz.
#[derive(Debug, Serialize)]
pub struct ResultWithQuiz {
    #[serde(flatten)]
    pub result: QuizResult,
    pub quiz_title: Option<String>,
}

/// One entry of a user's attempt history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptLink {
    pub user_id: i64,
    pub quiz_id: i64,
    pub result_id: i64,
}

/// History row shown to users and admins.
#[derive(Debug, Serialize)]
pub struct AttemptHistoryEntry {
    pub quiz_id: i64,
    pub quiz_title: String,
    pub result_id: i64,
    pub score: i64,
    pub accuracy: String,
    pub speed: String,
    pub completed_at: DateTime<Utc>,
}
