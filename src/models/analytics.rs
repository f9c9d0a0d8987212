// src/models/analytics.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Summary statistics for one quiz, recomputed on every request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsSummary {
    pub total_attempts: i64,
    pub average_score: f64,
    pub passing_rate: f64,
    pub average_time: f64,

    /// Counts for 0-20, 21-40, 41-60, 61-80, 81-100.
    pub score_distribution: [i64; 5],
    pub question_performance: Vec<QuestionPerformance>,
    pub recent_attempts: Vec<RecentAttempt>,
}

/// Per-question statistics. `id` is the question's position in the quiz.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionPerformance {
    pub id: usize,
    pub text: String,
    pub correct_count: i64,
    pub total_attempts: i64,
    pub correct_rate: f64,
    pub average_time: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecentAttempt {
    pub id: i64,
    pub user_name: String,
    pub score: i64,
    pub time_taken: i64,
    pub date: DateTime<Utc>,
}

/// Cross-quiz row of the admin overview.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizOverview {
    pub title: String,
    pub total_attempts: i64,
    pub average_score: f64,
    pub average_time_spent: f64,
}

/// One user's performance on quizzes sharing a title.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategoryPerformance {
    pub attempts: i64,
    pub total_score: i64,
    pub average_score: f64,
    pub average_accuracy: f64,
    pub highest_score: i64,
    pub total_time_spent: i64,
}
