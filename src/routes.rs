// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{attempt, auth, question, quiz},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public: register, login, logout.
/// * Authenticated: everything else, behind `auth_middleware`.
/// * Authoring routes additionally sit behind `admin_middleware`.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(require_auth.clone()),
        );

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        .merge(
            Router::new()
                .route("/", post(quiz::create_quiz))
                .route("/{id}", put(quiz::update_quiz).delete(quiz::delete_quiz))
                .layer(middleware::from_fn(admin_middleware)),
        )
        .layer(require_auth.clone());

    let question_routes = Router::new()
        .route("/quiz/{quiz_id}", get(question::list_for_quiz))
        .merge(
            Router::new()
                .route("/quiz/{quiz_id}/admin", get(question::list_for_admin))
                .route("/", post(question::create_question))
                .route(
                    "/{id}",
                    put(question::update_question).delete(question::delete_question),
                )
                .layer(middleware::from_fn(admin_middleware)),
        )
        .layer(require_auth.clone());

    let attempt_routes = Router::new()
        .route("/submit", post(attempt::submit_attempt))
        .route("/quiz/{quiz_id}", get(attempt::list_my_attempts))
        .layer(require_auth);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/attempts", attempt_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::Config, policy::Role, utils::jwt::sign_jwt};

    const SECRET: &str = "router-test-secret";

    fn app() -> Router {
        create_router(AppState::in_memory(Config::for_tests(SECRET)))
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_credentials() {
        let response = app()
            .oneshot(Request::get("/api/quizzes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
    }

    #[tokio::test]
    async fn authoring_routes_reject_users_before_reading_the_body() {
        let token = sign_jwt(7, Role::User, SECRET, 60).unwrap();

        let response = app()
            .oneshot(
                Request::post("/api/quizzes")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json at all"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 403);
    }

    #[tokio::test]
    async fn public_routes_need_no_credentials() {
        let response = app()
            .oneshot(
                Request::post("/api/auth/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }
}
