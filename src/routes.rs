// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, evaluate, leaderboard, module, progress},
    state::AppState,
    utils::jwt::{auth_middleware, optional_auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, modules, progress, evaluate, leaderboard).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store, evaluator, config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:5173".parse().unwrap(),
        "http://127.0.0.1:5173".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let module_routes = Router::new()
        .route("/", get(module::list_modules))
        .route("/{id}", get(module::get_module))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let progress_routes = Router::new()
        .route("/", get(progress::get_progress))
        .route("/summary", get(progress::get_progress_summary))
        .route("/complete", post(progress::complete_exercise))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/modules", module_routes)
        .nest("/api/progress", progress_routes)
        .route("/api/evaluate", post(evaluate::evaluate_prompt))
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
