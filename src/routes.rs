// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{ai, exams, levels, progress, questions, simulation, stats},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the JSON API under `/api`.
/// * Serves the built client from `static_dir` for every other path.
/// * Applies global middleware (Trace, CORS).
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
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE]);

    let question_routes = Router::new()
        .route("/", get(questions::list_questions).post(questions::create_question))
        .route("/batch", post(questions::batch_import))
        .route("/{id}", get(questions::get_question))
        .route("/category/{category}", get(questions::questions_by_category))
        .route("/difficulty/{difficulty}", get(questions::questions_by_difficulty))
        .route(
            "/difficulty-range/{min}/{max}",
            get(questions::questions_by_difficulty_range),
        );

    let stats_routes = Router::new()
        .route("/{user_id}", get(stats::get_stats).patch(stats::update_stats))
        .route("/{user_id}/study-time", post(stats::add_study_time))
        .route("/{user_id}/reset", post(stats::reset_stats));

    let level_routes = Router::new()
        .route("/", get(levels::list_levels).post(levels::create_level))
        .route("/{id}", get(levels::get_level));

    let level_progress_routes = Router::new()
        .route("/", post(levels::create_level_progress))
        .route("/{user_id}", get(levels::list_level_progress))
        .route(
            "/{user_id}/{level_id}",
            get(levels::get_level_progress).patch(levels::update_level_progress),
        )
        .route("/{user_id}/{level_id}/session", post(levels::record_level_session));

    let ai_routes = Router::new()
        .route("/feedback", post(ai::feedback))
        .route("/chat", post(ai::chat))
        .route("/study-tip", post(ai::study_tip))
        .route("/question-hint", post(ai::question_hint));

    let api = Router::new()
        .nest("/questions", question_routes)
        .route("/progress", post(progress::record_progress))
        .route("/progress/{user_id}", get(progress::list_progress))
        .nest("/stats", stats_routes)
        .nest("/levels", level_routes)
        .nest("/level-progress", level_progress_routes)
        .nest("/ai", ai_routes)
        .route("/exams/convert", post(exams::convert_exam))
        .route("/exams/import", post(exams::import_exam))
        .route("/example-exam", get(exams::example_exam))
        .route("/exam-simulation/evaluate", post(simulation::evaluate_exam));

    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .nest("/api", api)
        .fallback_service(static_files)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
