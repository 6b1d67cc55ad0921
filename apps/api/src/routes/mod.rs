pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::labeling;
use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Match API
        .route("/match", post(handlers::handle_match))
        .route("/match-upload", post(handlers::handle_match_upload))
        .route("/matches/:request_id", get(handlers::handle_get_match))
        .route(
            "/matches/:request_id/result",
            get(handlers::handle_get_match_result),
        )
        // Image labeling
        .route(
            "/images/events",
            post(labeling::handlers::handle_storage_event),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
