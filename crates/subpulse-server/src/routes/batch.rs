//! Analysis of caller-supplied items, without touching Reddit.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use subpulse_core::{Comment, Post};

use super::reddit::{analyze_comments, analyze_posts};
use super::{CommentAnalysis, PostAnalysis};
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze/posts", post(post_analyze_posts))
        .route("/analyze/comments", post(post_analyze_comments))
        .route("/topics", post(post_topics))
}

#[derive(Deserialize)]
struct AnalyzePostsRequest {
    #[serde(default)]
    posts: Vec<Value>,
}

#[derive(Deserialize)]
struct AnalyzeCommentsRequest {
    #[serde(default)]
    comments: Vec<Value>,
    #[serde(default)]
    topics: bool,
}

#[derive(Deserialize)]
struct TopicsRequest {
    #[serde(default)]
    texts: Vec<Value>,
    top_n: Option<usize>,
}

/// Items are read leniently: off-type fields and non-object items fall
/// back to defaults instead of rejecting the batch.
async fn post_analyze_posts(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzePostsRequest>, JsonRejection>,
) -> ApiResult<Json<PostAnalysis>> {
    let Json(req) = body?;
    let posts = req.posts.into_iter().map(Post::from_value).collect();
    Ok(Json(analyze_posts(state, posts).await?))
}

async fn post_analyze_comments(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeCommentsRequest>, JsonRejection>,
) -> ApiResult<Json<CommentAnalysis>> {
    let Json(req) = body?;
    let comments = req.comments.into_iter().map(Comment::from_value).collect();
    Ok(Json(analyze_comments(state, comments, req.topics).await?))
}

/// Non-string entries count as empty texts.
async fn post_topics(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TopicsRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = body?;
    let top_n = req.top_n.unwrap_or_else(|| state.analyzer.top_n());
    let texts: Vec<String> = req
        .texts
        .iter()
        .map(|t| t.as_str().unwrap_or_default().to_string())
        .collect();

    let topics =
        tokio::task::spawn_blocking(move || state.analyzer.extract_topics(&texts, top_n)).await??;
    Ok(Json(serde_json::json!({ "topics": topics })))
}
