// src/repositories/question_repository.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::question::{Question, QuestionInput},
};

const QUESTION_COLUMNS: &str =
    "id, quiz_id, question_text, option_a, option_b, option_c, option_d, correct_answer, created_at";

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// In creation order. Empty for an unknown quiz.
    async fn list_by_quiz(&self, quiz_id: i64) -> AppResult<Vec<Question>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Question>>;
    /// The caller checks that the quiz exists.
    async fn create(&self, quiz_id: i64, input: &QuestionInput) -> AppResult<Question>;
    async fn update(&self, id: i64, input: &QuestionInput) -> AppResult<Option<Question>>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

pub struct PgQuestionRepository {
    pool: PgPool,
}

impl PgQuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepository for PgQuestionRepository {
    async fn list_by_quiz(&self, quiz_id: i64) -> AppResult<Vec<Question>> {
        let query = format!(
            "SELECT {} FROM questions WHERE quiz_id = $1 ORDER BY created_at ASC, id ASC",
            QUESTION_COLUMNS
        );
        let questions = sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(questions)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        let query = format!("SELECT {} FROM questions WHERE id = $1", QUESTION_COLUMNS);
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(question)
    }

    async fn create(&self, quiz_id: i64, input: &QuestionInput) -> AppResult<Question> {
        let query = format!(
            r#"
            INSERT INTO questions
            (quiz_id, question_text, option_a, option_b, option_c, option_d, correct_answer)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(quiz_id)
            .bind(&input.question_text)
            .bind(&input.option_a)
            .bind(&input.option_b)
            .bind(&input.option_c)
            .bind(&input.option_d)
            .bind(input.correct_answer.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create question: {:?}", e);
                e
            })?;
        Ok(question)
    }

    async fn update(&self, id: i64, input: &QuestionInput) -> AppResult<Option<Question>> {
        let query = format!(
            r#"
            UPDATE questions
            SET question_text = $1, option_a = $2, option_b = $3, option_c = $4,
                option_d = $5, correct_answer = $6
            WHERE id = $7
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(&input.question_text)
            .bind(&input.option_a)
            .bind(&input.option_b)
            .bind(&input.option_c)
            .bind(&input.option_d)
            .bind(input.correct_answer.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(question)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
