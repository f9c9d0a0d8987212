// src/handlers/quiz.rs

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    engine::scoring,
    error::AppError,
    models::{
        quiz::{PublicQuiz, QuizSummary},
        result::{ResultWithQuiz, SubmissionResponse, SubmitQuizRequest},
    },
    store::DynStore,
    utils::jwt::Claims,
};

/// Quiz id → title for every quiz, active or not.
pub(crate) async fn quiz_titles(store: &DynStore) -> Result<HashMap<i64, String>, AppError> {
    Ok(store
        .list_quizzes(false)
        .await?
        .into_iter()
        .map(|q| (q.id, q.title))
        .collect())
}

/// Lists active quizzes without their questions.
pub async fn list_quizzes(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    let quizzes = store.list_quizzes(true).await?;
    let summaries: Vec<QuizSummary> = quizzes.iter().map(QuizSummary::from).collect();
    Ok(Json(summaries))
}

/// Returns a quiz for attempting. Correct answers and explanations are hidden.
pub async fn get_quiz(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store
        .fetch_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(PublicQuiz::from(quiz)))
}

/// Submits a user's answers and scores the attempt.
///
/// * Rejects malformed payloads, inactive quizzes and quizzes without questions.
/// * Scores against the quiz's full question count.
/// * Stores the result and appends it to the user's attempt history.
/// * Responds with the stored result plus every question with its answer and explanation.
pub async fn submit_quiz(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    payload: Result<Json<SubmitQuizRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let user_id = claims.user_id()?;

    let quiz = store
        .fetch_quiz(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    if !quiz.is_active {
        return Err(AppError::BadRequest("Quiz is not active".to_string()));
    }

    if quiz.questions.is_empty() {
        return Err(AppError::BadRequest("Quiz has no questions".to_string()));
    }

    let scored = scoring::score(user_id, &quiz, &req.answers, req.time_spent);
    let stored = store.record_attempt(scored).await?;

    tracing::info!(
        user_id,
        quiz_id = quiz.id,
        result_id = stored.id,
        score = stored.score,
        "Quiz submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            result: stored,
            questions: quiz.questions,
        }),
    ))
}

/// Lists the current user's results, newest first.
pub async fn list_my_results(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let titles = quiz_titles(&store).await?;

    let results: Vec<ResultWithQuiz> = store
        .fetch_results_for_user(user_id)
        .await?
        .into_iter()
        .map(|result| ResultWithQuiz {
            quiz_title: titles.get(&result.quiz_id).cloned(),
            result,
        })
        .collect();

    Ok(Json(results))
}

/// Returns one result. Only its owner or an admin may read it.
pub async fn get_result(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let result = store
        .fetch_result(id)
        .await?
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    if result.user_id != user_id && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to access this result".to_string(),
        ));
    }

    let quiz_title = store.fetch_quiz(result.quiz_id).await?.map(|q| q.title);

    Ok(Json(ResultWithQuiz { result, quiz_title }))
}
