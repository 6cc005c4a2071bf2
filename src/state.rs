// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    config::Config,
    repositories::{
        AttemptRepository, MemoryStore, PgAttemptRepository, PgQuestionRepository,
        PgQuizRepository, PgUserRepository, QuestionRepository, QuizRepository, UserRepository,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub config: Config,
}

impl AppState {
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            quizzes: Arc::new(PgQuizRepository::new(pool.clone())),
            questions: Arc::new(PgQuestionRepository::new(pool.clone())),
            attempts: Arc::new(PgAttemptRepository::new(pool)),
            config,
        }
    }

    pub fn in_memory(config: Config) -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            quizzes: Arc::new(store.clone()),
            questions: Arc::new(store.clone()),
            attempts: Arc::new(store),
            config,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
