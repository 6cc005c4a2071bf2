// src/repositories/quiz_repository.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::quiz::{Quiz, QuizInput},
};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> AppResult<Vec<Quiz>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>>;
    async fn create(&self, input: &QuizInput, created_by: i64) -> AppResult<Quiz>;
    async fn update(&self, id: i64, input: &QuizInput) -> AppResult<Option<Quiz>>;
    /// Removes the quiz together with its questions. Returns false if it did not exist.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct PgQuizRepository {
    pool: PgPool,
}

impl PgQuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuizRepository for PgQuizRepository {
    async fn list(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT
                q.id, q.title, q.category, q.time_limit, q.total_questions,
                q.created_by, q.created_at,
                (SELECT COUNT(*) FROM questions qs WHERE qs.quiz_id = q.id) AS question_count
            FROM quizzes q
            ORDER BY q.created_at DESC, q.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            SELECT
                q.id, q.title, q.category, q.time_limit, q.total_questions,
                q.created_by, q.created_at,
                (SELECT COUNT(*) FROM questions qs WHERE qs.quiz_id = q.id) AS question_count
            FROM quizzes q
            WHERE q.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn create(&self, input: &QuizInput, created_by: i64) -> AppResult<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, category, time_limit, total_questions, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, title, category, time_limit, total_questions, created_by, created_at,
                0::BIGINT AS question_count
            "#,
        )
        .bind(&input.title)
        .bind(&input.category)
        .bind(input.time_limit)
        .bind(input.total_questions)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            e
        })?;

        Ok(quiz)
    }

    async fn update(&self, id: i64, input: &QuizInput) -> AppResult<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            WITH updated AS (
                UPDATE quizzes
                SET title = $1, category = $2, time_limit = $3, total_questions = $4
                WHERE id = $5
                RETURNING id, title, category, time_limit, total_questions, created_by, created_at
            )
            SELECT
                u.*,
                (SELECT COUNT(*) FROM questions qs WHERE qs.quiz_id = u.id) AS question_count
            FROM updated u
            "#,
        )
        .bind(&input.title)
        .bind(&input.category)
        .bind(input.time_limit)
        .bind(input.total_questions)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        // questions go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
