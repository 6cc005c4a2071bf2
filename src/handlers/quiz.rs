// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::quiz::{Quiz, QuizInput},
    state::AppState,
    utils::{extract::ValidatedJson, jwt::Claims},
};

fn quiz_not_found() -> AppError {
    AppError::NotFound("Quiz not found".to_string())
}

/// Lists all quizzes, newest first, with their question counts.
#[utoipa::path(
    get,
    path = "/api/quizzes",
    tag = "quizzes",
    responses(
        (status = 200, description = "All quizzes", body = Vec<Quiz>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let quizzes = state.quizzes.list().await?;
    Ok(Json(quizzes))
}

#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    tag = "quizzes",
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "The quiz", body = Quiz),
        (status = 404, description = "No such quiz"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = state.quizzes.find_by_id(id).await?.ok_or_else(quiz_not_found)?;
    Ok(Json(quiz))
}

/// Creates a quiz owned by the calling admin.
/// Admin only.
#[utoipa::path(
    post,
    path = "/api/quizzes",
    tag = "quizzes",
    request_body = QuizInput,
    responses(
        (status = 201, description = "Quiz created", body = Quiz),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(input): ValidatedJson<QuizInput>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = state
        .quizzes
        .create(&input.sanitized()?, claims.user_id()?)
        .await?;

    tracing::info!(quiz_id = quiz.id, "quiz created");
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Admin only.
#[utoipa::path(
    put,
    path = "/api/quizzes/{id}",
    tag = "quizzes",
    params(("id" = i64, Path, description = "Quiz id")),
    request_body = QuizInput,
    responses(
        (status = 200, description = "Quiz updated", body = Quiz),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such quiz"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(input): ValidatedJson<QuizInput>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = state
        .quizzes
        .update(id, &input.sanitized()?)
        .await?
        .ok_or_else(quiz_not_found)?;

    Ok(Json(quiz))
}

/// Deletes a quiz and, with it, all of its questions.
/// Admin only. Attempt history is kept.
#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    tag = "quizzes",
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "Quiz deleted"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such quiz"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.quizzes.delete(id).await? {
        return Err(quiz_not_found());
    }

    tracing::info!(quiz_id = id, "quiz deleted");
    Ok(Json(json!({ "message": "Quiz deleted successfully" })))
}
