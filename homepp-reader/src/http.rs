use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::{ReaderState, ReaderStats};

pub fn router(state: ReaderState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
}

pub async fn health_handler() -> &'static str {
    "OK"
}

pub async fn stats_handler(State(state): State<ReaderState>) -> Json<ReaderStats> {
    Json(state.snapshot())
}
