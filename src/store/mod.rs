// src/store/mod.rs

//! Persistence seam between handlers and the backing store.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        quiz::{NewQuiz, Quiz, QuizChanges},
        result::{AttemptLink, QuizResult, ScoringResult},
        user::User,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle injected into handlers.
pub type DynStore = Arc<dyn QuizStore>;

/// Storage operations the service depends on.
///
/// Absence is reported as `None`/`false`; only genuine store failures are errors.
#[async_trait]
pub trait QuizStore: Send + Sync {
    async fn fetch_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError>;

    /// All quizzes, newest first.
    async fn list_quizzes(&self, active_only: bool) -> Result<Vec<Quiz>, AppError>;

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError>;

    /// Applies `changes`; a supplied question list replaces the existing one.
    async fn update_quiz(&self, id: i64, changes: QuizChanges) -> Result<Option<Quiz>, AppError>;

    /// Soft delete: the quiz stays readable for history and analytics.
    async fn deactivate_quiz(&self, id: i64) -> Result<bool, AppError>;

    async fn persist_result(&self, result: ScoringResult) -> Result<QuizResult, AppError>;

    async fn link_result_to_user(
        &self,
        user_id: i64,
        quiz_id: i64,
        result_id: i64,
    ) -> Result<(), AppError>;

    /// Stores a result and appends it to the owner's attempt history in one
    /// write. Either both land or neither does.
    async fn record_attempt(&self, result: ScoringResult) -> Result<QuizResult, AppError>;

    async fn fetch_result(&self, id: i64) -> Result<Option<QuizResult>, AppError>;

    async fn fetch_results_for_quiz(&self, quiz_id: i64) -> Result<Vec<QuizResult>, AppError>;

    /// A user's results, newest first.
    async fn fetch_results_for_user(&self, user_id: i64) -> Result<Vec<QuizResult>, AppError>;

    async fn fetch_all_results(&self) -> Result<Vec<QuizResult>, AppError>;

    /// A user's attempt links in insertion order.
    async fn attempt_history(&self, user_id: i64) -> Result<Vec<AttemptLink>, AppError>;

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Non-admin users.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
}
