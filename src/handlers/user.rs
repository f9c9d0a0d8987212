// src/handlers/user.rs

use std::collections::HashMap;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    engine::performance::by_category,
    error::AppError,
    handlers::quiz::quiz_titles,
    models::result::{AttemptHistoryEntry, QuizResult},
    store::DynStore,
    utils::jwt::Claims,
};

/// Resolves a user's attempt links into history rows.
/// Links whose quiz or result no longer exists are skipped.
pub(crate) async fn attempt_history_entries(
    store: &DynStore,
    user_id: i64,
) -> Result<Vec<AttemptHistoryEntry>, AppError> {
    let links = store.attempt_history(user_id).await?;
    let titles = quiz_titles(store).await?;
    let results: HashMap<i64, QuizResult> = store
        .fetch_results_for_user(user_id)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    Ok(links
        .into_iter()
        .filter_map(|link| {
            let title = titles.get(&link.quiz_id)?;
            let result = results.get(&link.result_id)?;
            Some(AttemptHistoryEntry {
                quiz_id: link.quiz_id,
                quiz_title: title.clone(),
                result_id: result.id,
                score: result.score,
                accuracy: result.accuracy.clone(),
                speed: result.speed.clone(),
                completed_at: result.created_at,
            })
        })
        .collect())
}

/// Current user's attempt history.
pub async fn quiz_history(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    Ok(Json(attempt_history_entries(&store, user_id).await?))
}

/// Current user's performance grouped by quiz title.
pub async fn performance(
    State(store): State<DynStore>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let results = store.fetch_results_for_user(user_id).await?;
    let titles = quiz_titles(&store).await?;

    Ok(Json(by_category(&results, &titles)))
}
