// src/handlers/question.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, Question, QuestionInput, QuestionView},
    state::AppState,
    utils::{extract::ValidatedJson, jwt::Claims},
};

fn question_not_found() -> AppError {
    AppError::NotFound("Question not found".to_string())
}

/// Lists a quiz's questions in creation order.
///
/// `correctAnswer` is only present in the payload for admins.
/// An unknown quiz yields an empty list.
#[utoipa::path(
    get,
    path = "/api/questions/quiz/{quiz_id}",
    tag = "questions",
    params(("quiz_id" = i64, Path, description = "Quiz id")),
    responses((status = 200, description = "Questions", body = Vec<QuestionView>)),
    security(("bearer_auth" = []))
)]
pub async fn list_for_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<QuestionView> = state
        .questions
        .list_by_quiz(quiz_id)
        .await?
        .into_iter()
        .map(|q| q.view_for(claims.role))
        .collect();

    Ok(Json(questions))
}

/// Full question records including the answer key.
/// Admin only.
#[utoipa::path(
    get,
    path = "/api/questions/quiz/{quiz_id}/admin",
    tag = "questions",
    params(("quiz_id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "Questions with answers", body = Vec<Question>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_for_admin(
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let questions = state.questions.list_by_quiz(quiz_id).await?;
    Ok(Json(questions))
}

/// Adds a question to an existing quiz.
/// Admin only.
#[utoipa::path(
    post,
    path = "/api/questions",
    tag = "questions",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question created", body = Question),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such quiz"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_question(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.quizzes.find_by_id(payload.quiz_id).await?.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    let question = state
        .questions
        .create(payload.quiz_id, &payload.content.sanitized()?)
        .await?;

    tracing::info!(quiz_id = question.quiz_id, question_id = question.id, "question created");
    Ok((StatusCode::CREATED, Json(question)))
}

/// Replaces a question's content. The owning quiz cannot be changed.
/// Admin only.
#[utoipa::path(
    put,
    path = "/api/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    request_body = QuestionInput,
    responses(
        (status = 200, description = "Question updated", body = Question),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such question"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<QuestionInput>,
) -> Result<impl IntoResponse, AppError> {
    let question = state
        .questions
        .update(id, &input.sanitized()?)
        .await?
        .ok_or_else(question_not_found)?;

    Ok(Json(question))
}

/// Admin only.
#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    tag = "questions",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question deleted"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such question"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.questions.delete(id).await? {
        return Err(question_not_found());
    }

    Ok(Json(json!({ "message": "Question deleted successfully" })))
}
