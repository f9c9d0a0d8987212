// src/store/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder, Transaction, types::Json};

use crate::{
    error::AppError,
    models::{
        quiz::{NewQuestion, NewQuiz, Question, Quiz, QuizChanges},
        result::{AnswerRecord, AttemptLink, QuizResult, ScoringResult},
        user::User,
    },
    store::QuizStore,
};

const QUIZ_COLUMNS: &str = "id, title, description, time_limit, is_active, created_at, updated_at";

const RESULT_COLUMNS: &str = "id, user_id, quiz_id, score, total_questions, answered_questions, \
     correct_answers, accuracy, speed, time_spent, answers, created_at";

/// Row of the 'quizzes' table.
#[derive(FromRow)]
struct QuizRow {
    id: i64,
    title: String,
    description: String,
    time_limit: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuizRow {
    fn into_quiz(self, questions: Vec<Question>) -> Quiz {
        Quiz {
            id: self.id,
            title: self.title,
            description: self.description,
            time_limit: self.time_limit,
            questions,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row of the 'quiz_questions' table.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    quiz_id: i64,
    prompt: String,
    options: Json<Vec<String>>,
    correct_answer: String,
    explanation: String,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: row.id,
            prompt: row.prompt,
            options: row.options.0,
            correct_answer: row.correct_answer,
            explanation: row.explanation,
        }
    }
}

/// Row of the 'quiz_results' table.
#[derive(FromRow)]
struct ResultRow {
    id: i64,
    user_id: i64,
    quiz_id: i64,
    score: i64,
    total_questions: i64,
    answered_questions: i64,
    correct_answers: i64,
    accuracy: String,
    speed: String,
    time_spent: Option<i64>,
    answers: Json<Vec<AnswerRecord>>,
    created_at: DateTime<Utc>,
}

impl From<ResultRow> for QuizResult {
    fn from(row: ResultRow) -> Self {
        QuizResult {
            id: row.id,
            user_id: row.user_id,
            quiz_id: row.quiz_id,
            score: row.score,
            total_questions: row.total_questions,
            answered_questions: row.answered_questions,
            correct_answers: row.correct_answers,
            accuracy: row.accuracy,
            speed: row.speed,
            time_spent: row.time_spent,
            answers: row.answers.0,
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Questions of the given quizzes, keyed by quiz id, in display order.
    async fn questions_for(&self, quiz_ids: &[i64]) -> Result<HashMap<i64, Vec<Question>>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, quiz_id, prompt, options, correct_answer, explanation
            FROM quiz_questions
            WHERE quiz_id = ANY($1)
            ORDER BY quiz_id, position
            "#,
        )
        .bind(quiz_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch quiz questions: {:?}", e);
            AppError::from(e)
        })?;

        let mut grouped: HashMap<i64, Vec<Question>> = HashMap::new();
        for row in rows {
            grouped.entry(row.quiz_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn assemble(&self, rows: Vec<QuizRow>) -> Result<Vec<Quiz>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut questions = self.questions_for(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let qs = questions.remove(&row.id).unwrap_or_default();
                row.into_quiz(qs)
            })
            .collect())
    }

    async fn insert_questions(
        tx: &mut Transaction<'static, Postgres>,
        quiz_id: i64,
        questions: Vec<NewQuestion>,
    ) -> Result<Vec<Question>, AppError> {
        let mut inserted = Vec::with_capacity(questions.len());
        for (position, q) in questions.into_iter().enumerate() {
            let row = sqlx::query_as::<_, QuestionRow>(
                r#"
                INSERT INTO quiz_questions
                (quiz_id, position, prompt, options, correct_answer, explanation)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, quiz_id, prompt, options, correct_answer, explanation
                "#,
            )
            .bind(quiz_id)
            .bind(position as i32)
            .bind(q.prompt)
            .bind(Json(q.options))
            .bind(q.correct_answer)
            .bind(q.explanation)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert question: {:?}", e);
                AppError::from(e)
            })?;
            inserted.push(row.into());
        }
        Ok(inserted)
    }

    async fn insert_result<'e, E>(
        executor: E,
        result: &ScoringResult,
    ) -> Result<(i64, DateTime<Utc>), AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO quiz_results
            (user_id, quiz_id, score, total_questions, answered_questions,
             correct_answers, accuracy, speed, time_spent, answers)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, created_at
            "#,
        )
        .bind(result.user_id)
        .bind(result.quiz_id)
        .bind(result.score)
        .bind(result.total_questions)
        .bind(result.answered_questions)
        .bind(result.correct_answers)
        .bind(&result.accuracy)
        .bind(&result.speed)
        .bind(result.time_spent)
        .bind(Json(&result.answers))
        .fetch_one(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to persist result: {:?}", e);
            AppError::from(e)
        })
    }

    async fn insert_link<'e, E>(
        executor: E,
        user_id: i64,
        quiz_id: i64,
        result_id: i64,
    ) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("INSERT INTO user_quiz_attempts (user_id, quiz_id, result_id) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(quiz_id)
            .bind(result_id)
            .execute(executor)
            .await
            .map_err(|e| {
                tracing::error!("Failed to link result to user: {:?}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    async fn results_where(&self, filter: &str, id: Option<i64>) -> Result<Vec<QuizResult>, AppError> {
        let sql = format!("SELECT {} FROM quiz_results {}", RESULT_COLUMNS, filter);
        let mut query = sqlx::query_as::<_, ResultRow>(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to fetch results: {:?}", e);
            AppError::from(e)
        })?;
        Ok(rows.into_iter().map(QuizResult::from).collect())
    }
}

#[async_trait]
impl QuizStore for PgStore {
    async fn fetch_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        let sql = format!("SELECT {} FROM quizzes WHERE id = $1", QUIZ_COLUMNS);
        let row = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_quizzes(&self, active_only: bool) -> Result<Vec<Quiz>, AppError> {
        let sql = format!(
            "SELECT {} FROM quizzes WHERE ($1 = FALSE OR is_active) ORDER BY created_at DESC, id DESC",
            QUIZ_COLUMNS
        );
        let rows = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list quizzes: {:?}", e);
                AppError::from(e)
            })?;

        self.assemble(rows).await
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO quizzes (title, description, time_limit, is_active) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            QUIZ_COLUMNS
        );
        let row = sqlx::query_as::<_, QuizRow>(&sql)
            .bind(quiz.title)
            .bind(quiz.description)
            .bind(quiz.time_limit)
            .bind(quiz.is_active)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create quiz: {:?}", e);
                AppError::from(e)
            })?;

        let questions = Self::insert_questions(&mut tx, row.id, quiz.questions).await?;
        tx.commit().await?;

        Ok(row.into_quiz(questions))
    }

    async fn update_quiz(&self, id: i64, changes: QuizChanges) -> Result<Option<Quiz>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE quizzes SET updated_at = NOW()");

        if let Some(title) = changes.title {
            builder.push(", title = ");
            builder.push_bind(title);
        }

        if let Some(description) = changes.description {
            builder.push(", description = ");
            builder.push_bind(description);
        }

        if let Some(time_limit) = changes.time_limit {
            builder.push(", time_limit = ");
            builder.push_bind(time_limit);
        }

        if let Some(is_active) = changes.is_active {
            builder.push(", is_active = ");
            builder.push_bind(is_active);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(QUIZ_COLUMNS);

        let row: Option<QuizRow> = builder
            .build_query_as()
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update quiz: {:?}", e);
                AppError::from(e)
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let quiz = match changes.questions {
            Some(questions) => {
                sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                let questions = Self::insert_questions(&mut tx, id, questions).await?;
                tx.commit().await?;
                row.into_quiz(questions)
            }
            None => {
                tx.commit().await?;
                let mut quizzes = self.assemble(vec![row]).await?;
                match quizzes.pop() {
                    Some(quiz) => quiz,
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(quiz))
    }

    async fn deactivate_quiz(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE quizzes SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to deactivate quiz: {:?}", e);
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn persist_result(&self, result: ScoringResult) -> Result<QuizResult, AppError> {
        let (id, created_at) = Self::insert_result(&self.pool, &result).await?;
        Ok(QuizResult::from_scoring(id, result, created_at))
    }

    async fn link_result_to_user(
        &self,
        user_id: i64,
        quiz_id: i64,
        result_id: i64,
    ) -> Result<(), AppError> {
        Self::insert_link(&self.pool, user_id, quiz_id, result_id).await
    }

    async fn record_attempt(&self, result: ScoringResult) -> Result<QuizResult, AppError> {
        let mut tx = self.pool.begin().await?;
        let (id, created_at) = Self::insert_result(&mut *tx, &result).await?;
        Self::insert_link(&mut *tx, result.user_id, result.quiz_id, id).await?;
        tx.commit().await?;

        Ok(QuizResult::from_scoring(id, result, created_at))
    }

    async fn fetch_result(&self, id: i64) -> Result<Option<QuizResult>, AppError> {
        Ok(self.results_where("WHERE id = $1", Some(id)).await?.pop())
    }

    async fn fetch_results_for_quiz(&self, quiz_id: i64) -> Result<Vec<QuizResult>, AppError> {
        self.results_where("WHERE quiz_id = $1", Some(quiz_id)).await
    }

    async fn fetch_results_for_user(&self, user_id: i64) -> Result<Vec<QuizResult>, AppError> {
        self.results_where("WHERE user_id = $1 ORDER BY created_at DESC, id DESC", Some(user_id))
            .await
    }

    async fn fetch_all_results(&self) -> Result<Vec<QuizResult>, AppError> {
        self.results_where("", None).await
    }

    async fn attempt_history(&self, user_id: i64) -> Result<Vec<AttemptLink>, AppError> {
        let rows: Vec<(i64, i64, i64)> = sqlx::query_as(
            "SELECT user_id, quiz_id, result_id FROM user_quiz_attempts WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, quiz_id, result_id)| AttemptLink {
                user_id,
                quiz_id,
                result_id,
            })
            .collect())
    }

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, role, created_at FROM users WHERE role <> 'admin' ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list users: {:?}", e);
            AppError::from(e)
        })?;
        Ok(users)
    }
}
