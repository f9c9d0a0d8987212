// src/engine/analytics.rs

use std::collections::{BTreeMap, HashMap};

use crate::{
    config::{PASSING_SCORE, RECENT_ATTEMPTS_LIMIT, SCORE_BUCKET_EDGES},
    models::{
        analytics::{AnalyticsSummary, QuestionPerformance, QuizOverview, RecentAttempt},
        quiz::Quiz,
        result::QuizResult,
    },
};

const ANONYMOUS: &str = "Anonymous";

/// Running totals for one question slot.
#[derive(Debug, Clone, Default)]
struct SlotTotals {
    correct_count: i64,
    total_attempts: i64,
    total_time: f64,
    time_count: i64,
}

/// Running totals across all results of a quiz.
#[derive(Debug, Clone)]
struct Totals {
    attempts: i64,
    score_sum: i64,
    passing: i64,
    time_sum: i64,
    time_count: i64,
    distribution: [i64; 5],
    slots: Vec<SlotTotals>,
}

impl Totals {
    fn new(question_count: usize) -> Self {
        Self {
            attempts: 0,
            score_sum: 0,
            passing: 0,
            time_sum: 0,
            time_count: 0,
            distribution: [0; 5],
            slots: vec![SlotTotals::default(); question_count],
        }
    }

    fn absorb(mut self, result: &QuizResult) -> Self {
        self.attempts += 1;
        self.score_sum = self.score_sum.saturating_add(result.score);
        if result.score >= PASSING_SCORE {
            self.passing += 1;
        }
        // Stored times predate any capping, so sums saturate
        if let Some(minutes) = result.time_spent {
            self.time_sum = self.time_sum.saturating_add(minutes);
            self.time_count += 1;
        }
        self.distribution[bucket(result.score)] += 1;

        // Answers are attributed to questions by position, not by id. Editing a
        // quiz's question order after attempts exist misattributes these stats.
        for (slot, answer) in self.slots.iter_mut().zip(&result.answers) {
            slot.total_attempts += 1;
            if answer.is_correct {
                slot.correct_count += 1;
            }
            if answer.time_taken > 0.0 {
                slot.total_time += answer.time_taken;
                slot.time_count += 1;
            }
        }
        self
    }
}

/// Histogram bucket for a score; upper bounds are inclusive.
pub fn bucket(score: i64) -> usize {
    SCORE_BUCKET_EDGES
        .iter()
        .position(|&edge| score <= edge)
        .unwrap_or(SCORE_BUCKET_EDGES.len())
}

fn ratio(numerator: f64, denominator: i64) -> f64 {
    if denominator > 0 {
        numerator / denominator as f64
    } else {
        0.0
    }
}

/// Summary statistics over every stored attempt of `quiz`.
///
/// `user_names` resolves owners for the recent-attempts view; owners missing
/// from it are shown as "Anonymous".
pub fn summarize(
    quiz: &Quiz,
    results: &[QuizResult],
    user_names: &HashMap<i64, String>,
) -> AnalyticsSummary {
    if results.is_empty() {
        return AnalyticsSummary {
            total_attempts: 0,
            average_score: 0.0,
            passing_rate: 0.0,
            average_time: 0.0,
            score_distribution: [0; 5],
            question_performance: Vec::new(),
            recent_attempts: Vec::new(),
        };
    }

    let totals = results
        .iter()
        .fold(Totals::new(quiz.questions.len()), Totals::absorb);

    let question_performance = quiz
        .questions
        .iter()
        .zip(&totals.slots)
        .enumerate()
        .map(|(index, (question, slot))| QuestionPerformance {
            id: index,
            text: question.prompt.clone(),
            correct_count: slot.correct_count,
            total_attempts: slot.total_attempts,
            correct_rate: ratio(slot.correct_count as f64, slot.total_attempts),
            average_time: ratio(slot.total_time, slot.time_count),
        })
        .collect();

    AnalyticsSummary {
        total_attempts: totals.attempts,
        average_score: ratio(totals.score_sum as f64, totals.attempts),
        passing_rate: ratio(totals.passing as f64 * 100.0, totals.attempts),
        average_time: ratio(totals.time_sum as f64, totals.time_count),
        score_distribution: totals.distribution,
        question_performance,
        recent_attempts: recent_attempts(results, user_names),
    }
}

fn recent_attempts(results: &[QuizResult], user_names: &HashMap<i64, String>) -> Vec<RecentAttempt> {
    let mut newest_first: Vec<&QuizResult> = results.iter().collect();
    newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    newest_first
        .into_iter()
        .take(RECENT_ATTEMPTS_LIMIT)
        .map(|result| RecentAttempt {
            id: result.id,
            user_name: user_names
                .get(&result.user_id)
                .cloned()
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            score: result.score,
            time_taken: result.time_spent.unwrap_or(0),
            date: result.created_at,
        })
        .collect()
}

/// Attempts, average score and average time per quiz title, sorted by title.
///
/// Results whose quiz is not in `quiz_titles` are left out.
pub fn overview(results: &[QuizResult], quiz_titles: &HashMap<i64, String>) -> Vec<QuizOverview> {
    #[derive(Default)]
    struct Group {
        attempts: i64,
        score_sum: i64,
        time_sum: i64,
        time_count: i64,
    }

    let groups = results
        .iter()
        .filter_map(|r| quiz_titles.get(&r.quiz_id).map(|title| (title, r)))
        .fold(BTreeMap::<&String, Group>::new(), |mut groups, (title, r)| {
            let group = groups.entry(title).or_default();
            group.attempts += 1;
            group.score_sum = group.score_sum.saturating_add(r.score);
            if let Some(minutes) = r.time_spent {
                group.time_sum = group.time_sum.saturating_add(minutes);
                group.time_count += 1;
            }
            groups
        });

    groups
        .into_iter()
        .map(|(title, g)| QuizOverview {
            title: title.clone(),
            total_attempts: g.attempts,
            average_score: ratio(g.score_sum as f64, g.attempts),
            average_time_spent: ratio(g.time_sum as f64, g.time_count),
        })
        .collect()
}
