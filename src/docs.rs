// src/docs.rs

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    handlers::{attempt, auth, question, quiz},
    models::{
        attempt::{
            Attempt, AttemptHistoryEntry, AttemptResult, QuizLabel, ReviewedQuestion,
            SubmitAttemptRequest,
        },
        question::{CreateQuestionRequest, Letter, Question, QuestionInput, QuestionView},
        quiz::{Quiz, QuizInput},
        user::{AuthResponse, LoginRequest, RegisterRequest, User},
    },
    policy::Role,
};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Quiz API", description = "Timed multiple-choice quizzes"),
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        quiz::list_quizzes,
        quiz::get_quiz,
        quiz::create_quiz,
        quiz::update_quiz,
        quiz::delete_quiz,
        question::list_for_quiz,
        question::list_for_admin,
        question::create_question,
        question::update_question,
        question::delete_question,
        attempt::submit_attempt,
        attempt::list_my_attempts,
    ),
    components(schemas(
        Role,
        User,
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        Quiz,
        QuizInput,
        Letter,
        Question,
        QuestionView,
        QuestionInput,
        CreateQuestionRequest,
        Attempt,
        QuizLabel,
        AttemptHistoryEntry,
        SubmitAttemptRequest,
        ReviewedQuestion,
        AttemptResult,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
