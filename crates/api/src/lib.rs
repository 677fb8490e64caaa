pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = state.settings.app.max_upload_mb * 1024 * 1024;

    // Account / persistence routes
    let api = Router::new()
        .route("/users", post(routes::user::register))
        .route("/login", post(routes::user::login))
        .route("/metadata", post(routes::metadata::create))
        .route(
            "/metadata/{metadata_id}/chat",
            post(routes::metadata::add_chat_message),
        )
        .route(
            "/metadata/{metadata_id}/flashcards",
            post(routes::metadata::add_flashcard),
        )
        .route("/history", post(routes::history::create));

    Router::new()
        .route("/health", get(health_check))
        .route("/upload", post(routes::upload::upload_video))
        .route("/status/{task_id}", get(routes::status::get_status))
        .route(
            "/generate_flashcards/{task_id}",
            post(routes::enrichment::generate_flashcards),
        )
        .route(
            "/generate_mindmap/{task_id}",
            post(routes::enrichment::generate_mindmap),
        )
        .route("/debug/tasks", get(routes::status::debug_tasks))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Service + datastore liveness.
async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.db.run_command(bson::doc! { "ping": 1 }).await {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "running",
                "database": "connected",
            })),
        ),
        Err(e) => {
            error!(error = %e, "Health check: database ping failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "running",
                    "database": "disconnected",
                    "error": e.to_string(),
                })),
            )
        }
    }
}
