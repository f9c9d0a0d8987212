// src/store/memory.rs

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        quiz::{NewQuestion, NewQuiz, Question, Quiz, QuizChanges},
        result::{AttemptLink, QuizResult, ScoringResult},
        user::User,
    },
    store::QuizStore,
};

#[derive(Default)]
struct Tables {
    quizzes: Vec<Quiz>,
    results: Vec<QuizResult>,
    links: Vec<AttemptLink>,
    users: Vec<User>,
    next_quiz_id: i64,
    next_question_id: i64,
    next_result_id: i64,
    next_user_id: i64,
}

impl Tables {
    fn questions(&mut self, questions: Vec<NewQuestion>) -> Vec<Question> {
        questions
            .into_iter()
            .map(|q| {
                self.next_question_id += 1;
                Question {
                    id: self.next_question_id,
                    prompt: q.prompt,
                    options: q.options,
                    correct_answer: q.correct_answer,
                    explanation: q.explanation,
                }
            })
            .collect()
    }
}

/// Process-local store used by tests and when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user account. Accounts normally come from the identity service.
    pub fn insert_user(&self, username: &str, role: &str) -> Result<User, AppError> {
        let mut tables = self.write()?;
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            email: None,
            role: role.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::InternalServerError("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::InternalServerError("memory store lock poisoned".to_string()))
    }
}

fn newest_first<T, K: Ord>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn fetch_quiz(&self, id: i64) -> Result<Option<Quiz>, AppError> {
        Ok(self.read()?.quizzes.iter().find(|q| q.id == id).cloned())
    }

    async fn list_quizzes(&self, active_only: bool) -> Result<Vec<Quiz>, AppError> {
        let tables = self.read()?;
        let quizzes = tables
            .quizzes
            .iter()
            .filter(|q| !active_only || q.is_active)
            .cloned();
        Ok(newest_first(quizzes, |q| (q.created_at, q.id)))
    }

    async fn create_quiz(&self, quiz: NewQuiz) -> Result<Quiz, AppError> {
        let mut tables = self.write()?;
        tables.next_quiz_id += 1;
        let now = Utc::now();
        let created = Quiz {
            id: tables.next_quiz_id,
            title: quiz.title,
            description: quiz.description,
            time_limit: quiz.time_limit,
            questions: tables.questions(quiz.questions),
            is_active: quiz.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.quizzes.push(created.clone());
        Ok(created)
    }

    async fn update_quiz(&self, id: i64, changes: QuizChanges) -> Result<Option<Quiz>, AppError> {
        let mut tables = self.write()?;
        let Some(index) = tables.quizzes.iter().position(|q| q.id == id) else {
            return Ok(None);
        };

        let questions = changes.questions.map(|qs| tables.questions(qs));
        let quiz = &mut tables.quizzes[index];
        if let Some(title) = changes.title {
            quiz.title = title;
        }
        if let Some(description) = changes.description {
            quiz.description = description;
        }
        if let Some(time_limit) = changes.time_limit {
            quiz.time_limit = time_limit;
        }
        if let Some(is_active) = changes.is_active {
            quiz.is_active = is_active;
        }
        if let Some(questions) = questions {
            quiz.questions = questions;
        }
        quiz.updated_at = Utc::now();
        Ok(Some(quiz.clone()))
    }

    async fn deactivate_quiz(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        match tables.quizzes.iter_mut().find(|q| q.id == id) {
            Some(quiz) => {
                quiz.is_active = false;
                quiz.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn persist_result(&self, result: ScoringResult) -> Result<QuizResult, AppError> {
        let mut tables = self.write()?;
        tables.next_result_id += 1;
        let stored = QuizResult::from_scoring(tables.next_result_id, result, Utc::now());
        tables.results.push(stored.clone());
        Ok(stored)
    }

    async fn link_result_to_user(
        &self,
        user_id: i64,
        quiz_id: i64,
        result_id: i64,
    ) -> Result<(), AppError> {
        self.write()?.links.push(AttemptLink {
            user_id,
            quiz_id,
            result_id,
        });
        Ok(())
    }

    async fn record_attempt(&self, result: ScoringResult) -> Result<QuizResult, AppError> {
        let mut tables = self.write()?;
        tables.next_result_id += 1;
        let stored = QuizResult::from_scoring(tables.next_result_id, result, Utc::now());
        tables.links.push(AttemptLink {
            user_id: stored.user_id,
            quiz_id: stored.quiz_id,
            result_id: stored.id,
        });
        tables.results.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_result(&self, id: i64) -> Result<Option<QuizResult>, AppError> {
        Ok(self.read()?.results.iter().find(|r| r.id == id).cloned())
    }

    async fn fetch_results_for_quiz(&self, quiz_id: i64) -> Result<Vec<QuizResult>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .results
            .iter()
            .filter(|r| r.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn fetch_results_for_user(&self, user_id: i64) -> Result<Vec<QuizResult>, AppError> {
        let tables = self.read()?;
        let results = tables.results.iter().filter(|r| r.user_id == user_id).cloned();
        Ok(newest_first(results, |r| (r.created_at, r.id)))
    }

    async fn fetch_all_results(&self) -> Result<Vec<QuizResult>, AppError> {
        Ok(self.read()?.results.clone())
    }

    async fn attempt_history(&self, user_id: i64) -> Result<Vec<AttemptLink>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .copied()
            .collect())
    }

    async fn fetch_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .users
            .iter()
            .filter(|u| !u.is_admin())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_quiz(title: &str) -> NewQuiz {
        NewQuiz {
            title: title.to_string(),
            description: "desc".to_string(),
            time_limit: 30,
            is_active: true,
            questions: vec![NewQuestion {
                prompt: "2 + 2?".to_string(),
                options: vec!["3".into(), "4".into()],
                correct_answer: "4".to_string(),
                explanation: "Arithmetic".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn quiz_lifecycle() {
        let store = MemoryStore::new();
        let quiz = store.create_quiz(new_quiz("Numerical Reasoning")).await.unwrap();
        assert_eq!(quiz.id, 1);
        assert_eq!(quiz.questions[0].id, 1);

        let updated = store
            .update_quiz(
                quiz.id,
                QuizChanges {
                    title: Some("Logical Reasoning".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Logical Reasoning");
        assert_eq!(updated.questions, quiz.questions);

        assert!(store.deactivate_quiz(quiz.id).await.unwrap());
        assert!(store.list_quizzes(true).await.unwrap().is_empty());
        assert_eq!(store.list_quizzes(false).await.unwrap().len(), 1);
        assert!(!store.deactivate_quiz(404).await.unwrap());
        assert!(store.update_quiz(404, QuizChanges::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replacing_questions_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let quiz = store.create_quiz(new_quiz("Verbal Reasoning")).await.unwrap();
        let updated = store
            .update_quiz(
                quiz.id,
                QuizChanges {
                    questions: Some(new_quiz("x").questions),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_ne!(updated.questions[0].id, quiz.questions[0].id);
    }

    #[tokio::test]
    async fn results_and_links_are_scoped_per_user() {
        let store = MemoryStore::new();
        let alice = store.insert_user("alice", "user").unwrap();
        store.insert_user("root", "admin").unwrap();

        let scored = ScoringResult {
            user_id: alice.id,
            quiz_id: 3,
            score: 80,
            total_questions: 5,
            answered_questions: 5,
            correct_answers: 4,
            accuracy: "80%".to_string(),
            speed: "1.00 questions/minute".to_string(),
            time_spent: 5,
            answers: Vec::new(),
        };
        let first = store.persist_result(scored.clone()).await.unwrap();
        let second = store.persist_result(scored).await.unwrap();
        store.link_result_to_user(alice.id, 3, first.id).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.fetch_results_for_quiz(3).await.unwrap().len(), 2);
        assert!(store.fetch_results_for_user(alice.id + 1).await.unwrap().is_empty());
        assert_eq!(store.fetch_results_for_user(alice.id).await.unwrap()[0].id, second.id);
        assert_eq!(store.attempt_history(alice.id).await.unwrap().len(), 1);

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
    }

    #[tokio::test]
    async fn recorded_attempt_is_stored_and_linked_together() {
        let store = MemoryStore::new();
        let bob = store.insert_user("bob", "user").unwrap();

        let stored = store
            .record_attempt(ScoringResult {
                user_id: bob.id,
                quiz_id: 4,
                score: 50,
                total_questions: 2,
                answered_questions: 2,
                correct_answers: 1,
                accuracy: "50%".to_string(),
                speed: "2.00 questions/minute".to_string(),
                time_spent: 1,
                answers: Vec::new(),
            })
            .await
            .unwrap();

        assert_eq!(store.fetch_result(stored.id).await.unwrap().unwrap().score, 50);
        let links = store.attempt_history(bob.id).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].quiz_id, 4);
        assert_eq!(links[0].result_id, stored.id);
    }
}
