// src/repositories/attempt_repository.rs

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use crate::{
    error::AppResult,
    models::attempt::{Attempt, AttemptHistoryEntry, NewAttempt},
};

/// Attempts are append-only: there is no update or delete.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    async fn create(&self, attempt: NewAttempt) -> AppResult<Attempt>;
    /// A user's attempts at one quiz, newest first.
    async fn list_for_user_and_quiz(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> AppResult<Vec<AttemptHistoryEntry>>;
}

pub struct PgAttemptRepository {
    pool: PgPool,
}

impl PgAttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptRepository for PgAttemptRepository {
    async fn create(&self, attempt: NewAttempt) -> AppResult<Attempt> {
        let created = sqlx::query_as::<_, Attempt>(
            r#"
            INSERT INTO attempts (user_id, quiz_id, score, total_questions, answers, time_taken)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, quiz_id, score, total_questions, answers, time_taken, completed_at
            "#,
        )
        .bind(attempt.user_id)
        .bind(attempt.quiz_id)
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .bind(Json(&attempt.answers))
        .bind(attempt.time_taken)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert attempt: {:?}", e);
            e
        })?;

        Ok(created)
    }

    async fn list_for_user_and_quiz(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> AppResult<Vec<AttemptHistoryEntry>> {
        let attempts = sqlx::query_as::<_, AttemptHistoryEntry>(
            r#"
            SELECT
                a.id, a.user_id, a.quiz_id, a.score, a.total_questions,
                a.answers, a.time_taken, a.completed_at,
                q.title, q.category
            FROM attempts a
            LEFT JOIN quizzes q ON q.id = a.quiz_id
            WHERE a.user_id = $1 AND a.quiz_id = $2
            ORDER BY a.completed_at DESC, a.id DESC
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }
}
