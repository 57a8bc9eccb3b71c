//! HTTP route handlers.

pub mod batch;
pub mod reddit;
pub mod root;

use std::sync::Arc;

use axum::Router;
use serde::Serialize;
use subpulse_core::{AnnotatedComment, AnnotatedPost, BatchResult, OverallSentiment, Topic};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(root::routes())
        .merge(reddit::routes())
        .merge(batch::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Analyzed posts as served to the dashboard.
#[derive(Debug, Serialize)]
pub struct PostAnalysis {
    pub posts: Vec<AnnotatedPost>,
    pub topics: Vec<Topic>,
    pub overall_sentiment: OverallSentiment,
}

impl From<BatchResult<AnnotatedPost>> for PostAnalysis {
    fn from(batch: BatchResult<AnnotatedPost>) -> Self {
        Self {
            posts: batch.items,
            topics: batch.topics,
            overall_sentiment: batch.overall_sentiment,
        }
    }
}

/// Analyzed comments as served to the dashboard.
#[derive(Debug, Serialize)]
pub struct CommentAnalysis {
    pub comments: Vec<AnnotatedComment>,
    pub topics: Vec<Topic>,
    pub overall_sentiment: OverallSentiment,
}

impl From<BatchResult<AnnotatedComment>> for CommentAnalysis {
    fn from(batch: BatchResult<AnnotatedComment>) -> Self {
        Self {
            comments: batch.items,
            topics: batch.topics,
            overall_sentiment: batch.overall_sentiment,
        }
    }
}
