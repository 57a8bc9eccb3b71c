//! Live Reddit routes: fetch from the content source, then analyze.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use subpulse_core::{Comment, Post};
use tracing::debug;

use super::{CommentAnalysis, PostAnalysis};
use crate::error::{bounded_limit, path_segment, ApiError, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trending", get(get_trending))
        .route("/subreddit/{name}", get(get_subreddit))
        .route("/search", get(get_search))
        .route("/post/{id}/comments", get(get_post_comments))
}

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct CommentParams {
    limit: Option<i64>,
    #[serde(default)]
    topics: bool,
}

/// Score posts on the blocking pool.
pub(crate) async fn analyze_posts(state: Arc<AppState>, posts: Vec<Post>) -> ApiResult<PostAnalysis> {
    let batch = tokio::task::spawn_blocking(move || state.analyzer.analyze_posts(&posts)).await??;
    Ok(batch.into())
}

/// Score comments on the blocking pool.
pub(crate) async fn analyze_comments(
    state: Arc<AppState>,
    comments: Vec<Comment>,
    with_topics: bool,
) -> ApiResult<CommentAnalysis> {
    let batch = tokio::task::spawn_blocking(move || {
        state.analyzer.analyze_comments(&comments, with_topics)
    })
    .await??;
    Ok(batch.into())
}

/// `GET /trending?limit=10`: popular subreddit names.
async fn get_trending(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Json<serde_json::Value>> {
    let Query(params) = query?;
    let limit = bounded_limit(params.limit, 10, 1, 50)?;
    let names = state.reddit.trending_subreddits(limit).await?;
    Ok(Json(serde_json::json!({ "trending_subreddits": names })))
}

/// `GET /subreddit/{name}?limit=25`: hot posts of one subreddit.
async fn get_subreddit(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    query: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Json<PostAnalysis>> {
    let name = path_segment("subreddit name", name)?;
    let Query(params) = query?;
    let limit = bounded_limit(params.limit, 25, 1, 100)?;
    let posts = state.reddit.hot_posts(&name, limit).await?;
    debug!("Analyzing {} hot posts from r/{}", posts.len(), name);
    Ok(Json(analyze_posts(state, posts).await?))
}

/// `GET /search?query=..&limit=50`: search results across Reddit.
async fn get_search(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<PostAnalysis>> {
    let Query(params) = query?;
    let search = params
        .query
        .ok_or_else(|| ApiError::unprocessable("query parameter is required"))?;
    let limit = bounded_limit(params.limit, 50, 1, 200)?;
    let posts = state.reddit.search(&search, limit).await?;
    debug!("Analyzing {} search results for {:?}", posts.len(), search);
    Ok(Json(analyze_posts(state, posts).await?))
}

/// `GET /post/{id}/comments?limit=100&topics=false`: a post's comment tree.
async fn get_post_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<CommentParams>, QueryRejection>,
) -> ApiResult<Json<CommentAnalysis>> {
    let id = path_segment("post id", id)?;
    let Query(params) = query?;
    let limit = bounded_limit(params.limit, 100, 1, 500)?;
    let comments = state.reddit.post_comments(&id, limit).await?;
    Ok(Json(analyze_comments(state, comments, params.topics).await?))
}
