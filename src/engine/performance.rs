// src/engine/performance.rs

use std::collections::{BTreeMap, HashMap};

use crate::models::{analytics::CategoryPerformance, result::QuizResult};

/// Numeric value of an accuracy string such as "85%". Unparseable values count as 0.
pub fn parse_accuracy(accuracy: &str) -> f64 {
    accuracy
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// A user's performance grouped by quiz title.
///
/// Results whose quiz is not in `quiz_titles` are skipped.
pub fn by_category(
    results: &[QuizResult],
    quiz_titles: &HashMap<i64, String>,
) -> BTreeMap<String, CategoryPerformance> {
    let grouped = results
        .iter()
        .filter_map(|r| quiz_titles.get(&r.quiz_id).map(|title| (title, r)))
        .fold(
            BTreeMap::<String, (CategoryPerformance, f64)>::new(),
            |mut acc, (title, r)| {
                let (category, accuracy_sum) = acc.entry(title.clone()).or_default();
                category.attempts += 1;
                category.total_score = category.total_score.saturating_add(r.score);
                category.total_time_spent = category
                    .total_time_spent
                    .saturating_add(r.time_spent.unwrap_or(0));
                category.highest_score = category.highest_score.max(r.score);
                *accuracy_sum += parse_accuracy(&r.accuracy);
                acc
            },
        );

    grouped
        .into_iter()
        .map(|(title, (mut category, accuracy_sum))| {
            let attempts = category.attempts as f64;
            category.average_score = category.total_score as f64 / attempts;
            category.average_accuracy = accuracy_sum / attempts;
            (title, category)
        })
        .collect()
}
