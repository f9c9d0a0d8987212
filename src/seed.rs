// src/seed.rs

//! Sample quiz content for fresh installations.

use crate::{
    config::DEFAULT_TIME_LIMIT,
    error::AppError,
    models::quiz::{NewQuestion, NewQuiz},
    store::QuizStore,
};

fn question(prompt: &str, options: [&str; 4], correct: &str, explanation: &str) -> NewQuestion {
    NewQuestion {
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: correct.to_string(),
        explanation: explanation.to_string(),
    }
}

pub fn sample_quizzes() -> Vec<NewQuiz> {
    vec![
        NewQuiz {
            title: "Numerical Reasoning".to_string(),
            description: "Test your mathematical and analytical abilities with number-based problems."
                .to_string(),
            time_limit: DEFAULT_TIME_LIMIT,
            is_active: true,
            questions: vec![
                question(
                    "What is 15% of 200?",
                    ["20", "25", "30", "35"],
                    "30",
                    "15% of 200 is (15/100) * 200 = 30.",
                ),
                question(
                    "If a shirt costs $25 and is discounted by 20%, what is the new price?",
                    ["$15", "$18", "$20", "$22"],
                    "$20",
                    "20% of $25 is $5, so the new price is $25 - $5 = $20.",
                ),
                question(
                    "If 6 workers can complete a task in 12 days, how many days would it take 8 workers?",
                    ["6", "8", "9", "16"],
                    "9",
                    "The task is 6 × 12 = 72 worker-days; 72 ÷ 8 = 9 days.",
                ),
                question(
                    "A train travels at 60 mph. How far will it travel in 2.5 hours?",
                    ["120 miles", "140 miles", "150 miles", "180 miles"],
                    "150 miles",
                    "Distance = Speed × Time = 60 × 2.5 = 150 miles.",
                ),
            ],
        },
        NewQuiz {
            title: "Verbal Reasoning".to_string(),
            description: "Assess your ability to understand and reason with written information."
                .to_string(),
            time_limit: DEFAULT_TIME_LIMIT,
            is_active: true,
            questions: vec![
                question(
                    "Choose the word most similar in meaning to 'abundant'.",
                    ["Scarce", "Plentiful", "Modest", "Average"],
                    "Plentiful",
                    "'Abundant' means existing in large quantities.",
                ),
                question(
                    "Choose the word opposite in meaning to 'transparent'.",
                    ["Clear", "Obvious", "Opaque", "Visible"],
                    "Opaque",
                    "Opaque means not able to be seen through.",
                ),
                question(
                    "Book is to reading as fork is to:",
                    ["Drawing", "Writing", "Stirring", "Eating"],
                    "Eating",
                    "A book is used for reading; a fork is used for eating.",
                ),
            ],
        },
        NewQuiz {
            title: "Logical Reasoning".to_string(),
            description: "Evaluate your ability to identify patterns and draw conclusions.".to_string(),
            time_limit: DEFAULT_TIME_LIMIT,
            is_active: true,
            questions: vec![
                question(
                    "What comes next: 2, 6, 12, 20, 30, ?",
                    ["40", "42", "44", "46"],
                    "42",
                    "The differences grow by 2 each step: +4, +6, +8, +10, +12.",
                ),
                question(
                    "All roses are flowers. Some flowers fade quickly. Which must be true?",
                    [
                        "All roses fade quickly",
                        "Some roses fade quickly",
                        "No roses fade quickly",
                        "None of the above",
                    ],
                    "None of the above",
                    "The quickly fading flowers need not include any roses.",
                ),
            ],
        },
    ]
}

/// Inserts the sample quizzes when the store holds no quizzes yet.
/// Returns how many were inserted.
pub async fn seed_sample_quizzes(store: &dyn QuizStore) -> Result<usize, AppError> {
    if !store.list_quizzes(false).await?.is_empty() {
        return Ok(0);
    }

    let quizzes = sample_quizzes();
    let count = quizzes.len();
    for quiz in quizzes {
        let created = store.create_quiz(quiz).await?;
        tracing::info!(quiz_id = created.id, title = %created.title, "Seeded quiz");
    }
    Ok(count)
}
