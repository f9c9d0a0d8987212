// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::result::AttemptHistoryEntry;

/// Represents the 'users' table in the database.
/// Accounts are provisioned by the identity service; this service only reads them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    pub email: Option<String>,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// A user together with their attempt history (admin view).
#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: User,
    pub quizzes: Vec<AttemptHistoryEntry>,
}
