// tests/common/mod.rs

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};
use quiz_backend::{
    config::Config,
    models::user::User,
    routes,
    state::AppState,
    store::{DynStore, MemoryStore},
    utils::jwt::Claims,
};

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a user directly in the store and returns it with a bearer token.
    pub fn user(&self, role: &str) -> (User, String) {
        let name = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let user = self.store.insert_user(&name, role).expect("Failed to insert user");
        let token = token_for(&user.id.to_string(), role);
        (user, token)
    }

    /// Creates a quiz through the admin API and returns its JSON.
    pub async fn create_quiz(&self, admin_token: &str, body: serde_json::Value) -> serde_json::Value {
        let response = self
            .client
            .post(self.url("/api/admin/quizzes"))
            .bearer_auth(admin_token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse quiz json")
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: JWT_SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        seed_sample_quizzes: false,
    }
}

pub fn test_state(store: Arc<MemoryStore>) -> AppState {
    let store: DynStore = store;
    AppState {
        store,
        config: test_config(),
    }
}

/// Mints a token the way the identity service would.
pub fn token_for(sub: &str, role: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_secs() as usize;
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp: now + 600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// Spawns the app on a random port backed by a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let app = routes::create_router(test_state(store.clone()));

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

/// A four-question quiz whose correct answers are all "A".
pub fn four_question_quiz(title: &str) -> serde_json::Value {
    let questions: Vec<serde_json::Value> = (1..=4)
        .map(|i| {
            serde_json::json!({
                "prompt": format!("Question {}", i),
                "options": ["A", "B", "C", "D"],
                "correct_answer": "A",
                "explanation": "Analysis"
            })
        })
        .collect();

    serde_json::json!({
        "title": title,
        "description": "Integration test quiz",
        "time_limit": 30,
        "questions": questions
    })
}
