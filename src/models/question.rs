// src/models/question.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::{clean_text, not_blank};
use crate::policy::{Permission, Role};

/// One of the four option slots of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not one of A, B, C, D")]
pub struct InvalidLetter(pub String);

impl FromStr for Letter {
    type Err = InvalidLetter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Letter::ALL
            .into_iter()
            .find(|letter| letter.as_str() == s)
            .ok_or_else(|| InvalidLetter(s.to_string()))
    }
}

impl TryFrom<String> for Letter {
    type Error = InvalidLetter;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,

    /// Owning quiz. Never changes after creation.
    pub quiz_id: i64,

    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    #[sqlx(try_from = "String")]
    pub correct_answer: Letter,

    pub created_at: DateTime<Utc>,
}

/// A question as shown to a particular caller.
/// `correctAnswer` is absent from the payload unless the caller may see the answer key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: i64,
    pub quiz_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<Letter>,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn view_for(self, role: Role) -> QuestionView {
        let correct_answer = role
            .allows(Permission::ViewAnswerKey)
            .then_some(self.correct_answer);

        QuestionView {
            id: self.id,
            quiz_id: self.quiz_id,
            question_text: self.question_text,
            option_a: self.option_a,
            option_b: self.option_b,
            option_c: self.option_c,
            option_d: self.option_d,
            correct_answer,
            created_at: self.created_at,
        }
    }
}

/// Editable content of a question.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(length(max = 1000), custom(function = not_blank))]
    pub question_text: String,
    #[validate(length(max = 500), custom(function = not_blank))]
    pub option_a: String,
    #[validate(length(max = 500), custom(function = not_blank))]
    pub option_b: String,
    #[validate(length(max = 500), custom(function = not_blank))]
    pub option_c: String,
    #[validate(length(max = 500), custom(function = not_blank))]
    pub option_d: String,
    /// Rejected at deserialization unless it is exactly one of "A", "B", "C", "D".
    pub correct_answer: Letter,
}

impl QuestionInput {
    /// Trims and sanitizes the free-text fields before they are stored.
    ///
    /// Fails when a field is left blank by the sanitizer, e.g. one that held
    /// nothing but a `<script>` block.
    pub fn sanitized(self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let question_text = clean_text("questionText", &self.question_text, &mut errors);
        let option_a = clean_text("optionA", &self.option_a, &mut errors);
        let option_b = clean_text("optionB", &self.option_b, &mut errors);
        let option_c = clean_text("optionC", &self.option_c, &mut errors);
        let option_d = clean_text("optionD", &self.option_d, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            question_text,
            option_a,
            option_b,
            option_c,
            option_d,
            correct_answer: self.correct_answer,
        })
    }
}

/// DTO for creating a question under a quiz.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub quiz_id: i64,
    #[serde(flatten)]
    #[validate(nested)]
    pub content: QuestionInput,
}
