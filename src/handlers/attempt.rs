// src/handlers/attempt.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    grading::{AnswerKey, grade},
    models::attempt::{
        AttemptHistoryEntry, AttemptResult, NewAttempt, ReviewedQuestion, SubmitAttemptRequest,
    },
    state::AppState,
    utils::{extract::ValidatedJson, jwt::Claims},
};

/// Grades a submitted answer sheet and records the attempt.
///
/// * Correct answers are read from the store, never from the request.
/// * Unanswered questions count as wrong.
/// * Every submission creates a new attempt; retakes are allowed.
/// * `timeTaken` is stored as reported.
#[utoipa::path(
    post,
    path = "/api/attempts/submit",
    tag = "attempts",
    request_body = SubmitAttemptRequest,
    responses(
        (status = 200, description = "Graded result with per-question review", body = AttemptResult),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "No such quiz"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(req): ValidatedJson<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    if state.quizzes.find_by_id(req.quiz_id).await?.is_none() {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }

    let questions = state.questions.list_by_quiz(req.quiz_id).await?;
    let keys: Vec<AnswerKey> = questions.iter().map(AnswerKey::from).collect();
    let graded = grade(&keys, &req.answers);

    let score = i32::try_from(graded.score)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    let total_questions = i32::try_from(graded.total_questions)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let attempt = state
        .attempts
        .create(NewAttempt {
            user_id,
            quiz_id: req.quiz_id,
            score,
            total_questions,
            answers: req.answers,
            time_taken: req.time_taken,
        })
        .await?;

    tracing::info!(
        user_id,
        quiz_id = attempt.quiz_id,
        attempt_id = attempt.id,
        score,
        total_questions,
        "attempt graded"
    );

    let review = questions
        .into_iter()
        .zip(graded.details)
        .map(|(question, detail)| ReviewedQuestion {
            id: question.id,
            question_text: question.question_text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            correct_answer: detail.correct_answer,
            user_answer: detail.submitted,
            is_correct: detail.is_correct,
        })
        .collect();

    Ok(Json(AttemptResult {
        attempt_id: attempt.id,
        score,
        total_questions,
        percentage: graded.percentage,
        questions: review,
    }))
}

/// The caller's own attempts at a quiz, newest first.
#[utoipa::path(
    get,
    path = "/api/attempts/quiz/{quiz_id}",
    tag = "attempts",
    params(("quiz_id" = i64, Path, description = "Quiz id")),
    responses((status = 200, description = "Attempt history", body = Vec<AttemptHistoryEntry>)),
    security(("bearer_auth" = []))
)]
pub async fn list_my_attempts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = state
        .attempts
        .list_for_user_and_quiz(claims.user_id()?, quiz_id)
        .await?;

    Ok(Json(attempts))
}
