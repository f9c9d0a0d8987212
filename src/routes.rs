// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, quiz, user},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quizzes, users, admin).
/// * Every route requires a bearer token; admin routes also require the admin role.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/results", get(quiz::list_my_results))
        .route("/results/{id}", get(quiz::get_result))
        .route("/{id}", get(quiz::get_quiz))
        .route("/{id}/submit", post(quiz::submit_quiz));

    let user_routes = Router::new()
        .route("/quiz-history", get(user::quiz_history))
        .route("/performance", get(user::performance));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", get(admin::get_user))
        .route(
            "/quizzes",
            get(admin::list_quizzes).post(admin::create_quiz),
        )
        .route(
            "/quizzes/{id}",
            put(admin::update_quiz).delete(admin::delete_quiz),
        )
        .route("/quizzes/{id}/analytics", get(admin::quiz_analytics))
        .route("/analytics/quizzes", get(admin::analytics_overview))
        // Runs after the auth layer below has injected the claims
        .layer(middleware::from_fn(admin_middleware));

    Router::new()
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/users", user_routes)
        .nest("/api/admin", admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
