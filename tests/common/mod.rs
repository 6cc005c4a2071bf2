// tests/common/mod.rs

#![allow(dead_code)]

use quiz_backend::{
    config::Config,
    models::user::NewUser,
    policy::Role,
    routes,
    state::AppState,
    utils::hash::hash_password,
};
use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub address: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port, backed by the in-memory store, with one
/// ADMIN account already seeded.
pub async fn spawn_app() -> TestApp {
    let state = AppState::in_memory(Config::for_tests("test_secret_for_integration_tests"));

    state
        .users
        .create(NewUser {
            email: ADMIN_EMAIL.to_string(),
            name: "Admin".to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).expect("hash admin password"),
            role: Role::Admin,
        })
        .await
        .expect("seed admin");

    let app = routes::create_router(state.clone());

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        state,
        client: reqwest::Client::new(),
    }
}

pub fn unique_email() -> String {
    format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Login failed")
            .json()
            .await
            .expect("Failed to parse login json");

        body["token"].as_str().expect("Token not found").to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Registers a fresh USER and returns its token.
    pub async fn user_token(&self) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "email": unique_email(),
                "password": "password123",
                "name": "Taker"
            }))
            .send()
            .await
            .expect("Register failed")
            .json()
            .await
            .expect("Failed to parse register json");

        body["token"].as_str().expect("Token not found").to_string()
    }

    pub async fn create_quiz(&self, token: &str, time_limit: i32) -> i64 {
        let response = self
            .client
            .post(self.url("/api/quizzes"))
            .bearer_auth(token)
            .json(&json!({
                "title": "Rust basics",
                "category": "Programming",
                "timeLimit": time_limit,
                "totalQuestions": 4
            }))
            .send()
            .await
            .expect("Create quiz failed");
        assert_eq!(response.status().as_u16(), 201);

        let quiz: Value = response.json().await.unwrap();
        quiz["id"].as_i64().expect("quiz id")
    }

    pub async fn create_question(&self, token: &str, quiz_id: i64, correct: &str) -> i64 {
        let response = self
            .client
            .post(self.url("/api/questions"))
            .bearer_auth(token)
            .json(&json!({
                "quizId": quiz_id,
                "questionText": "Which one?",
                "optionA": "first",
                "optionB": "second",
                "optionC": "third",
                "optionD": "fourth",
                "correctAnswer": correct
            }))
            .send()
            .await
            .expect("Create question failed");
        assert_eq!(response.status().as_u16(), 201);

        let question: Value = response.json().await.unwrap();
        question["id"].as_i64().expect("question id")
    }
}
