//! Response-shape tests for the dashboard API.
//!
//! The router is driven in-process with the built-in scorers. Only routes
//! that do not reach Reddit are exercised end to end; live routes are
//! checked for their validation behavior, which runs before any request.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use subpulse_analyze::{Analyzer, TextScorers};
use subpulse_core::SubPulseConfig;
use subpulse_server::{build_router, AppState};
use subpulse_source::RedditClient;

fn app() -> Router {
    app_with(SubPulseConfig::default())
}

fn app_with(config: SubPulseConfig) -> Router {
    let analyzer = Analyzer::new(TextScorers::builtin()).with_top_n(config.top_topics);
    let reddit = RedditClient::new(&config).unwrap();
    build_router(Arc::new(AppState::new(config, analyzer, reddit)))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    send_to(app(), request).await
}

async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_root_message() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "SubPulse Sentiment Analysis API"}));
}

#[tokio::test]
async fn test_health_shape() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["classifier"], false);
    assert_eq!(body["classifier_requested"], false);
    assert_eq!(body["reddit_oauth"], false);
    assert_eq!(body["top_topics"], 10);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_unloaded_classifier() {
    let config = SubPulseConfig {
        use_classifier: true,
        ..Default::default()
    };
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send_to(app_with(config), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classifier_requested"], true);
    assert_eq!(body["classifier"], false);
}

/// Matches the dashboard's PostAnalysisResponse:
/// { posts: Post[], topics: Topic[], overall_sentiment: SentimentData }
#[tokio::test]
async fn test_analyze_posts_shape() {
    let (status, body) = post(
        "/analyze/posts",
        json!({"posts": [
            {"id": "a", "title": "I love this amazing phone", "text": "Battery life is great",
             "score": 10, "num_comments": 2, "created_utc": "2024-01-01T00:00:00",
             "url": "https://example.com", "author": "alice", "subreddit": "phones",
             "flair": "Review"},
            {"id": "b", "title": "Worst update ever", "text": null},
            {"id": "c", "title": "Release notes"}
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["id"], "a");
    assert_eq!(posts[0]["flair"], "Review");
    assert_eq!(posts[0]["sentiment_category"], "positive");
    assert!(posts[0]["sentiment"]["title"]["compound"].is_number());
    assert!(posts[0]["sentiment"]["title"]["pos"].is_number());
    assert!(posts[0]["sentiment"]["content"]["neu"].is_number());
    assert!(posts[0]["sentiment"]["compound"].is_number());
    assert_eq!(posts[1]["text"], "");
    assert_eq!(posts[1]["sentiment_category"], "negative");
    assert_eq!(posts[2]["sentiment_category"], "neutral");

    let topics = body["topics"].as_array().unwrap();
    assert!(topics.len() <= 10);
    for topic in topics {
        assert!(topic["topic"].is_string());
        assert!(topic["count"].as_u64().unwrap() >= 1);
    }

    let overall = &body["overall_sentiment"];
    for key in ["compound", "positive", "neutral", "negative"] {
        assert!(overall[key].is_number(), "missing {}", key);
    }
    let total = overall["positive"].as_f64().unwrap()
        + overall["neutral"].as_f64().unwrap()
        + overall["negative"].as_f64().unwrap();
    assert!((total - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_mixed_batch_is_tolerated() {
    let (status, body) = post(
        "/analyze/posts",
        json!({"posts": [
            {"id": "a", "title": "good", "score": 1.5},
            {"id": "b", "title": "great"},
            {"id": 7},
            {"title": 123},
            {"created_utc": 1700000000.0},
            "not an object"
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 6);
    assert_eq!(posts[0]["score"], 1);
    assert_eq!(posts[2]["id"], "7");
    assert_eq!(posts[3]["title"], "");
    assert_eq!(posts[5]["sentiment_category"], "neutral");

    let (status, body) = post(
        "/analyze/comments",
        json!({"comments": [{"id": 1, "text": 5, "score": "3"}, null]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"], "1");
    assert_eq!(comments[0]["score"], 3);
}

#[tokio::test]
async fn test_analyze_empty_posts() {
    let (status, body) = post("/analyze/posts", json!({"posts": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "posts": [],
            "topics": [],
            "overall_sentiment": {"compound": 0.0, "positive": 0.0, "neutral": 0.0, "negative": 0.0}
        })
    );
}

#[tokio::test]
async fn test_analyze_comments_shape() {
    let comments = json!([
        {"id": "c1", "text": "This is terrible and I hate it", "author": "bob"},
        {"id": "c2", "text": "", "score": 4}
    ]);

    let (status, body) = post("/analyze/comments", json!({"comments": comments})).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["comments"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["sentiment_category"], "negative");
    assert!(items[0]["sentiment"]["neg"].as_f64().unwrap() > 0.0);
    assert!(items[0]["sentiment"].get("transformer_label").is_none());
    assert_eq!(items[1]["sentiment"]["compound"], 0.0);
    assert_eq!(items[1]["sentiment_category"], "neutral");
    assert_eq!(body["topics"], json!([]));
    assert_eq!(body["overall_sentiment"]["negative"], 0.5);

    let (_, with_topics) = post(
        "/analyze/comments",
        json!({"comments": comments, "topics": true}),
    )
    .await;
    assert!(with_topics["topics"].is_array());
}

#[tokio::test]
async fn test_topics_endpoint() {
    let (status, body) = post(
        "/topics",
        json!({"texts": ["Graphics card prices are high", "The graphics card prices", 42, null], "top_n": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let topics = body["topics"].as_array().unwrap();
    assert!(topics.len() <= 2);
    assert_eq!(topics[0]["topic"], "graphics card prices");
    assert_eq!(topics[0]["count"], 2);

    let (status, body) = post("/topics", json!({"texts": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"topics": []}));
}

#[tokio::test]
async fn test_malformed_body_has_detail() {
    let (status, body) = post("/analyze/posts", json!({"posts": "nope"})).await;
    assert!(status.is_client_error());
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_invalid_query_and_path_params() {
    for uri in [
        "/trending?limit=0",
        "/trending?limit=51",
        "/subreddit/rust?limit=101",
        "/search?query=rust&limit=201",
        "/post/abc/comments?limit=501",
        "/subreddit/rust?limit=abc",
        "/search",
        "/subreddit/rust%3Fx=1",
        "/subreddit/rust%2F..%2Fapi",
        "/post/a%2Fb/comments",
    ] {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert!(body["detail"].is_string(), "{}", uri);
    }
}
