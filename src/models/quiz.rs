// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::{clean_text, not_blank};

/// Represents the 'quizzes' table, joined with its question count.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub category: String,

    /// Time budget in minutes.
    pub time_limit: i32,

    /// Number of questions the author intends the quiz to have.
    pub total_questions: i32,

    /// User id of the authoring admin.
    pub created_by: i64,

    pub created_at: DateTime<Utc>,

    /// Number of questions currently attached.
    pub question_count: i64,
}

/// DTO for creating or updating a quiz.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizInput {
    #[validate(length(max = 200), custom(function = not_blank))]
    pub title: String,
    #[validate(length(max = 100), custom(function = not_blank))]
    pub category: String,
    #[validate(range(min = 1, message = "timeLimit must be at least 1 minute"))]
    pub time_limit: i32,
    #[validate(range(min = 1, message = "totalQuestions must be at least 1"))]
    pub total_questions: i32,
}

impl QuizInput {
    /// Trims and sanitizes the free-text fields before they are stored.
    /// Fails when the sanitizer leaves a field blank.
    pub fn sanitized(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = clean_text("title", &self.title, &mut errors);
        let category = clean_text("category", &self.category, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title,
            category,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> QuizInput {
        QuizInput {
            title: title.into(),
            category: " Programming ".into(),
            time_limit: 10,
            total_questions: 4,
        }
    }

    #[test]
    fn sanitizing_trims_and_strips_markup() {
        let cleaned = input(" Rust <script>alert(1)</script>basics ").sanitized().unwrap();
        assert_eq!(cleaned.title, "Rust basics");
        assert_eq!(cleaned.category, "Programming");
        assert_eq!(cleaned.time_limit, 10);
    }

    #[test]
    fn markup_only_title_is_rejected() {
        let errors = input("<script>x</script>").sanitized().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }
}
