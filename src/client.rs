// src/client.rs

//! HTTP client for the quiz-taking side of the API.
//!
//! Mirrors what the browser front-end does: sign in, pick a quiz, start a timed
//! session, submit once.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use thiserror::Error;

use crate::{
    models::{
        attempt::{AttemptHistoryEntry, AttemptResult, SubmitAttemptRequest},
        question::QuestionView,
        quiz::Quiz,
        user::{AuthResponse, User},
    },
    policy::{Destination, Navigation, navigate},
    session::{SharedSession, Submission, SubmissionSink},
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("not signed in")]
    NotAuthenticated,

    /// The viewer's role may not enter the requested destination.
    #[error("redirected to {}", .0.path())]
    Redirected(Destination),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    user: Option<User>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            user: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Where the signed-in viewer should land.
    pub fn home(&self) -> Destination {
        self.user
            .as_ref()
            .map(|user| user.role.home())
            .unwrap_or(Destination::Login)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        Err(ClientError::Api { status, message })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T, ClientError> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::read(builder.send().await?).await
    }

    fn signed_in(&mut self, auth: AuthResponse) -> User {
        self.token = Some(auth.token);
        self.user = Some(auth.user.clone());
        auth.user
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, ClientError> {
        let body = json!({ "email": email, "password": password, "name": name });
        let auth: AuthResponse = self
            .send(Method::POST, "/api/auth/register", Some(&body))
            .await?;
        Ok(self.signed_in(auth))
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ClientError> {
        let body = json!({ "email": email, "password": password });
        let auth: AuthResponse = self
            .send(Method::POST, "/api/auth/login", Some(&body))
            .await?;
        Ok(self.signed_in(auth))
    }

    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .send(Method::POST, "/api/auth/logout", None::<&()>)
            .await?;
        self.token = None;
        self.user = None;
        Ok(())
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.send(Method::GET, "/api/auth/me", None::<&()>).await
    }

    pub async fn quizzes(&self) -> Result<Vec<Quiz>, ClientError> {
        self.send(Method::GET, "/api/quizzes", None::<&()>).await
    }

    pub async fn quiz(&self, id: i64) -> Result<Quiz, ClientError> {
        self.send(Method::GET, &format!("/api/quizzes/{}", id), None::<&()>)
            .await
    }

    pub async fn questions(&self, quiz_id: i64) -> Result<Vec<QuestionView>, ClientError> {
        self.send(
            Method::GET,
            &format!("/api/questions/quiz/{}", quiz_id),
            None::<&()>,
        )
        .await
    }

    pub async fn submit(&self, request: &SubmitAttemptRequest) -> Result<AttemptResult, ClientError> {
        self.send(Method::POST, "/api/attempts/submit", Some(request))
            .await
    }

    /// The signed-in user's attempts at a quiz, newest first, each with the
    /// quiz's title and category.
    pub async fn history(&self, quiz_id: i64) -> Result<Vec<AttemptHistoryEntry>, ClientError> {
        self.send(
            Method::GET,
            &format!("/api/attempts/quiz/{}", quiz_id),
            None::<&()>,
        )
        .await
    }

    /// Opens a quiz for taking: checks the role gate, loads the quiz and its
    /// questions, then starts `session` on the quiz's time limit.
    pub async fn start_attempt(
        &self,
        session: &SharedSession,
        quiz_id: i64,
    ) -> Result<Vec<QuestionView>, ClientError> {
        let role = self.user.as_ref().map(|user| user.role);
        if let Navigation::Redirect(to) = navigate(role, &Destination::TakeQuiz(quiz_id)) {
            return Err(match to {
                Destination::Login => ClientError::NotAuthenticated,
                other => ClientError::Redirected(other),
            });
        }

        let quiz = self.quiz(quiz_id).await?;
        let questions = self.questions(quiz_id).await?;

        let minutes = u32::try_from(quiz.time_limit).unwrap_or(0);
        session.lock().await.start_quiz(quiz.id, minutes);
        tracing::debug!(quiz_id, minutes, "attempt started");

        Ok(questions)
    }
}

#[async_trait]
impl SubmissionSink for ApiClient {
    type Error = ClientError;

    async fn deliver(&self, submission: &Submission) -> Result<AttemptResult, ClientError> {
        self.submit(&submission.to_request()).await
    }
}
