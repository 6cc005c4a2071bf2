// src/models/attempt.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;
use validator::Validate;

use super::question::Letter;

/// Submitted answers keyed by question id. Values are kept exactly as sent;
/// anything other than the correct letter string grades as wrong.
pub type AnswerSheet = HashMap<i64, Value>;

/// Reads an answer sheet whose keys arrive as strings, including when the map
/// sits under a flattened struct.
fn answer_sheet<'de, D>(deserializer: D) -> Result<Json<AnswerSheet>, D::Error>
where
    D: Deserializer<'de>,
{
    HashMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| {
            key.parse()
                .map(|id| (id, value))
                .map_err(|_| D::Error::custom(format!("invalid question id '{}'", key)))
        })
        .collect::<Result<_, _>>()
        .map(Json)
}

/// Represents the 'attempts' table in the database.
/// One row per submission; rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,

    /// Answers exactly as submitted, keyed by question id.
    /// Stored as JSONB.
    #[schema(value_type = Object)]
    #[serde(deserialize_with = "answer_sheet")]
    pub answers: Json<AnswerSheet>,

    /// Client-reported duration in seconds. Informational only.
    pub time_taken: Option<i32>,

    pub completed_at: DateTime<Utc>,
}

/// Insert payload for the attempt store.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub answers: AnswerSheet,
    pub time_taken: Option<i32>,
}

/// Title and category of the quiz an attempt belongs to.
/// Empty when the quiz has been deleted since.
#[derive(Debug, Clone, Default, FromRow, Serialize, Deserialize, ToSchema)]
pub struct QuizLabel {
    pub title: Option<String>,
    pub category: Option<String>,
}

/// An attempt joined with its quiz label, as listed in a user's history.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct AttemptHistoryEntry {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attempt: Attempt,
    #[sqlx(flatten)]
    pub quiz: QuizLabel,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    pub quiz_id: i64,

    /// Key: question id. Value: the selected letter. Any JSON value is accepted
    /// and stored as sent.
    #[schema(value_type = Object)]
    pub answers: AnswerSheet,

    #[validate(range(min = 0, message = "timeTaken must not be negative"))]
    pub time_taken: Option<i32>,
}

/// One question in the post-grading review.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedQuestion {
    pub id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: Letter,
    #[schema(value_type = Option<String>)]
    pub user_answer: Option<Value>,
    pub is_correct: bool,
}

/// Returned by the submit endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub attempt_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: f64,
    pub questions: Vec<ReviewedQuestion>,
}
