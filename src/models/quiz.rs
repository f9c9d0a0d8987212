// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::DEFAULT_TIME_LIMIT;

/// A single multiple-choice question embedded in a quiz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: i64,

    /// The question text shown to the learner.
    pub prompt: String,

    /// Display order is significant.
    pub options: Vec<String>,

    /// Must be one of `options` when the quiz is created.
    pub correct_answer: String,

    pub explanation: String,
}

/// Represents a quiz together with its ordered questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// Time limit in minutes.
    pub time_limit: i32,

    pub questions: Vec<Question>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn question(&self, id: i64) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Listing view of a quiz (no questions).
#[derive(Debug, Serialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub time_limit: i32,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            time_limit: quiz.time_limit,
        }
    }
}

/// DTO for sending a question to a learner (excludes answer and explanation).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub prompt: String,
    pub options: Vec<String>,
}

/// DTO for a quiz being attempted.
#[derive(Debug, Serialize)]
pub struct PublicQuiz {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub time_limit: i32,
    pub questions: Vec<PublicQuestion>,
}

impl From<Quiz> for PublicQuiz {
    fn from(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            time_limit: quiz.time_limit,
            questions: quiz
                .questions
                .into_iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    prompt: q.prompt,
                    options: q.options,
                })
                .collect(),
        }
    }
}

/// DTO for creating a question as part of a quiz.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_correct_answer))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[validate(length(min = 1, max = 2000))]
    pub explanation: String,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(range(min = 1, max = 600))]
    pub time_limit: Option<i32>,
    pub is_active: Option<bool>,
    #[validate(length(min = 1, message = "A quiz needs at least one question."), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

/// DTO for updating a quiz. Fields are optional.
///
/// Replacing the question list does not re-check that each correct answer is
/// one of its options.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 600))]
    pub time_limit: Option<i32>,
    pub is_active: Option<bool>,
    #[validate(length(min = 1, message = "A quiz needs at least one question."))]
    pub questions: Option<Vec<NewQuestion>>,
}

/// Question content as written to the store (no id yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl From<CreateQuestionRequest> for NewQuestion {
    fn from(req: CreateQuestionRequest) -> Self {
        Self {
            prompt: req.prompt,
            options: req.options,
            correct_answer: req.correct_answer,
            explanation: req.explanation,
        }
    }
}

/// Quiz content as written to the store.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub time_limit: i32,
    pub is_active: bool,
    pub questions: Vec<NewQuestion>,
}

impl From<CreateQuizRequest> for NewQuiz {
    fn from(req: CreateQuizRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            time_limit: req.time_limit.unwrap_or(DEFAULT_TIME_LIMIT),
            is_active: req.is_active.unwrap_or(true),
            questions: req.questions.into_iter().map(NewQuestion::from).collect(),
        }
    }
}

/// Partial update applied by the store.
#[derive(Debug, Clone, Default)]
pub struct QuizChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_limit: Option<i32>,
    pub is_active: Option<bool>,
    pub questions: Option<Vec<NewQuestion>>,
}

impl QuizChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.time_limit.is_none()
            && self.is_active.is_none()
            && self.questions.is_none()
    }
}

impl From<UpdateQuizRequest> for QuizChanges {
    fn from(req: UpdateQuizRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            time_limit: req.time_limit,
            is_active: req.is_active,
            questions: req.questions,
        }
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

fn validate_correct_answer(req: &CreateQuestionRequest) -> Result<(), validator::ValidationError> {
    if !req.options.contains(&req.correct_answer) {
        let mut err = validator::ValidationError::new("correct_answer_not_in_options");
        err.message = Some("The correct answer must be one of the options".into());
        return Err(err);
    }
    Ok(())
}
