// src/handlers/admin.rs

use std::collections::{BTreeSet, HashMap};

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    engine::analytics,
    error::AppError,
    handlers::{quiz::quiz_titles, user::attempt_history_entries},
    models::{
        quiz::{CreateQuizRequest, NewQuiz, QuizChanges, UpdateQuizRequest},
        user::UserDetailResponse,
    },
    store::DynStore,
    utils::html::{clean_changes, clean_quiz},
};

/// Lists all non-admin users.
/// Admin only.
pub async fn list_users(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_users().await?))
}

/// Returns a user with their attempt history.
/// Admin only.
pub async fn get_user(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .fetch_user(id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let quizzes = attempt_history_entries(&store, user.id).await?;

    Ok(Json(UserDetailResponse { user, quizzes }))
}

/// Lists every quiz, including inactive ones, newest first.
/// Admin only.
pub async fn list_quizzes(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.list_quizzes(false).await?))
}

/// Creates a new quiz.
/// Admin only. Every correct answer must be one of its question's options.
pub async fn create_quiz(
    State(store): State<DynStore>,
    payload: Result<Json<CreateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let quiz = store.create_quiz(clean_quiz(NewQuiz::from(payload))).await?;
    tracing::info!(quiz_id = quiz.id, questions = quiz.questions.len(), "Quiz created");

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Updates a quiz by ID.
/// Admin only. A replacement question list must not be empty.
pub async fn update_quiz(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let changes = QuizChanges::from(payload);
    let updated = if changes.is_empty() {
        store.fetch_quiz(id).await?
    } else {
        store.update_quiz(id, clean_changes(changes)).await?
    };
    let quiz = updated.ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    tracing::info!(quiz_id = quiz.id, "Quiz updated");

    Ok(Json(quiz))
}

/// Deactivates a quiz by ID. Its results remain available.
/// Admin only.
pub async fn delete_quiz(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.deactivate_quiz(id).await? {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    tracing::info!(quiz_id = id, "Quiz deactivated");

    Ok(StatusCode::NO_CONTENT)
}

/// Summary statistics for one quiz.
/// Admin only.
pub async fn quiz_analytics(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .fetch_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let results = store.fetch_results_for_quiz(quiz.id).await?;

    let owners: BTreeSet<i64> = results.iter().map(|r| r.user_id).collect();
    let mut user_names = HashMap::with_capacity(owners.len());
    for user_id in owners {
        if let Some(user) = store.fetch_user(user_id).await? {
            user_names.insert(user_id, user.username);
        }
    }

    Ok(Json(analytics::summarize(&quiz, &results, &user_names)))
}

/// Attempts, average score and average time for every quiz title.
/// Admin only.
pub async fn analytics_overview(
    State(store): State<DynStore>,
) -> Result<impl IntoResponse, AppError> {
    let results = store.fetch_all_results().await?;
    let titles = quiz_titles(&store).await?;

    Ok(Json(analytics::overview(&results, &titles)))
}
