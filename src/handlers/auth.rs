// src/handlers/auth.rs

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::user::{AuthResponse, LoginRequest, NewUser, RegisterRequest, User, normalize_email},
    policy::Role,
    state::AppState,
    utils::{
        extract::ValidatedJson,
        hash::{hash_password, verify_password},
        jwt::{Claims, cleared_token_cookie, sign_jwt, token_cookie},
    },
};

/// Registers a new USER account and signs it in.
///
/// Hashes the password using Argon2 before storing it.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password_hash = hash_password(&payload.password)?;

    let user = state
        .users
        .create(NewUser {
            email: normalize_email(&payload.email),
            name: payload.name.trim().to_string(),
            password_hash,
            role: Role::User,
        })
        .await?;

    tracing::info!(user_id = user.id, "registered new user");

    let token = sign_jwt(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration,
    )?;
    let cookie = token_cookie(&token, state.config.jwt_expiration)?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse { token, user }),
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// Unknown email and wrong password produce the same 401.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = state
        .users
        .find_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "login rejected: wrong password");
        return Err(invalid());
    }

    let token = sign_jwt(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration,
    )?;
    let cookie = token_cookie(&token, state.config.jwt_expiration)?;

    Ok(([(header::SET_COOKIE, cookie)], Json(AuthResponse { token, user })))
}

/// Clears the credential cookie. Bearer tokens are stateless and simply dropped by the client.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Signed out"))
)]
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, cleared_token_cookie())],
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// Returns the account behind the presented credential.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing, invalid or orphaned credential"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users
        .find_by_id(claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

    Ok(Json(user))
}
