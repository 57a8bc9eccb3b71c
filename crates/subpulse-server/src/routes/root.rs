//! Service banner and health.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_root))
        .route("/health", get(get_health))
}

/// `GET /`: service banner.
async fn get_root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "SubPulse Sentiment Analysis API" }))
}

/// `GET /health`: backend availability. `classifier_requested` with
/// `classifier: false` means the model failed to load at startup.
async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "subpulse",
        "version": env!("CARGO_PKG_VERSION"),
        "classifier": state.analyzer.has_classifier(),
        "classifier_requested": state.config.use_classifier,
        "reddit_oauth": state.reddit.is_authenticated(),
        "top_topics": state.analyzer.top_n(),
    }))
}
