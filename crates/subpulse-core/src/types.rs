//! Domain types shared by the analysis pipeline, the content source and the API.
//!
//! Field names follow the JSON payloads served to the dashboard frontend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Compound threshold at or above which a text is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound threshold at or below which a text is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Polarity scores for a single text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScore {
    /// Normalized overall polarity in [-1, 1].
    pub compound: f64,
    #[serde(rename = "pos")]
    pub positive: f64,
    #[serde(rename = "neu")]
    pub neutral: f64,
    #[serde(rename = "neg")]
    pub negative: f64,
    /// Label from the secondary classifier, when one is enabled.
    #[serde(
        rename = "transformer_label",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    /// Confidence of the secondary classifier label.
    #[serde(
        rename = "transformer_score",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<f64>,
}

impl PolarityScore {
    /// The score assigned to empty or whitespace-only text.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// Three-way sentiment category derived from a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentCategory {
    Positive,
    Neutral,
    Negative,
}

impl SentimentCategory {
    /// Map a compound score to a category. Both thresholds are inclusive;
    /// anything strictly between them is neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass-through string field: strings as-is, numbers and booleans as
/// their JSON text, anything else empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Scored text field: anything but a string reads as empty text.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Pass-through integer field: floats truncate, numeric strings parse,
/// anything else is zero.
fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

/// A submission as supplied by the content source.
///
/// Deserialization never fails on a field: absent, `null` or off-type values
/// fall back to defaults. Fields the pipeline does not know about are kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    /// Self-text body; empty for link posts.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub score: i64,
    #[serde(default, deserialize_with = "lenient_int")]
    pub num_comments: i64,
    /// ISO-8601 creation time.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_utc: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subreddit: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A comment as supplied by the content source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_int")]
    pub score: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_utc: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Post {
    /// Read a post from arbitrary JSON. Anything but an object yields the
    /// default post.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

impl Comment {
    /// Read a comment from arbitrary JSON. Anything but an object yields the
    /// default comment.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Keys written by annotation; stale copies are dropped from `extra`.
const ANNOTATION_KEYS: &[&str] = &["sentiment", "sentiment_category"];

fn strip_annotation_keys(extra: &mut serde_json::Map<String, serde_json::Value>) {
    for key in ANNOTATION_KEYS {
        extra.remove(*key);
    }
}

/// Title, body and weighted compound sentiment of a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostSentiment {
    pub title: PolarityScore,
    pub content: PolarityScore,
    pub compound: f64,
}

/// A post with its sentiment attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPost {
    #[serde(flatten)]
    pub post: Post,
    pub sentiment: PostSentiment,
    pub sentiment_category: SentimentCategory,
}

impl AnnotatedPost {
    pub fn new(mut post: Post, sentiment: PostSentiment) -> Self {
        strip_annotation_keys(&mut post.extra);
        let sentiment_category = SentimentCategory::from_compound(sentiment.compound);
        Self {
            post,
            sentiment,
            sentiment_category,
        }
    }
}

/// A comment with its sentiment attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub sentiment: PolarityScore,
    pub sentiment_category: SentimentCategory,
}

impl AnnotatedComment {
    pub fn new(mut comment: Comment, sentiment: PolarityScore) -> Self {
        strip_annotation_keys(&mut comment.extra);
        let sentiment_category = SentimentCategory::from_compound(sentiment.compound);
        Self {
            comment,
            sentiment,
            sentiment_category,
        }
    }
}

/// An annotated item that contributes to batch statistics.
pub trait Scored {
    fn compound(&self) -> f64;
    fn category(&self) -> SentimentCategory;
}

impl Scored for AnnotatedPost {
    fn compound(&self) -> f64 {
        self.sentiment.compound
    }

    fn category(&self) -> SentimentCategory {
        self.sentiment_category
    }
}

impl Scored for AnnotatedComment {
    fn compound(&self) -> f64 {
        self.sentiment.compound
    }

    fn category(&self) -> SentimentCategory {
        self.sentiment_category
    }
}

/// A recurring phrase and its frequency across a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    pub count: usize,
}

/// Corpus-level sentiment statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallSentiment {
    /// Mean compound score.
    pub compound: f64,
    /// Fraction of positive items.
    pub positive: f64,
    /// Fraction of neutral items.
    pub neutral: f64,
    /// Fraction of negative items.
    pub negative: f64,
}

/// Annotated items, topics and statistics for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult<T> {
    pub items: Vec<T>,
    pub topics: Vec<Topic>,
    pub overall_sentiment: OverallSentiment,
}

impl<T> BatchResult<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            topics: Vec::new(),
            overall_sentiment: OverallSentiment::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_thresholds() {
        assert_eq!(SentimentCategory::from_compound(0.05), SentimentCategory::Positive);
        assert_eq!(SentimentCategory::from_compound(-0.05), SentimentCategory::Negative);
        assert_eq!(SentimentCategory::from_compound(0.0), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_compound(0.0500001), SentimentCategory::Positive);
        assert_eq!(SentimentCategory::from_compound(0.0499999), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_compound(-0.0499999), SentimentCategory::Neutral);
    }

    #[test]
    fn test_polarity_wire_names() {
        let value = serde_json::to_value(PolarityScore {
            compound: 0.5,
            positive: 0.4,
            neutral: 0.6,
            negative: 0.0,
            label: None,
            confidence: None,
        })
        .unwrap();
        assert_eq!(value, json!({"compound": 0.5, "pos": 0.4, "neu": 0.6, "neg": 0.0}));
    }

    #[test]
    fn test_post_defaults_missing_and_null_fields() {
        let post: Post = serde_json::from_value(json!({
            "id": "abc",
            "text": null,
            "flair": "Discussion",
        }))
        .unwrap();
        assert_eq!(post.id, "abc");
        assert_eq!(post.title, "");
        assert_eq!(post.text, "");
        assert_eq!(post.score, 0);
        assert_eq!(post.extra.get("flair"), Some(&json!("Discussion")));
    }

    #[test]
    fn test_off_type_fields_fall_back() {
        let post: Post = serde_json::from_value(json!({
            "id": 7,
            "title": 123,
            "text": ["not", "text"],
            "score": 1.5,
            "num_comments": "42",
            "created_utc": 1700000000.0,
            "url": false,
            "author": {"name": "x"},
        }))
        .unwrap();
        assert_eq!(post.id, "7");
        assert_eq!(post.title, "");
        assert_eq!(post.text, "");
        assert_eq!(post.score, 1);
        assert_eq!(post.num_comments, 42);
        assert_eq!(post.created_utc, "1700000000.0");
        assert_eq!(post.url, "false");
        assert_eq!(post.author, "");

        let comment: Comment =
            serde_json::from_value(json!({"id": "c", "text": 5, "score": "many"})).unwrap();
        assert_eq!(comment.text, "");
        assert_eq!(comment.score, 0);
    }

    #[test]
    fn test_from_value_tolerates_non_objects() {
        assert_eq!(Post::from_value(json!(5)), Post::default());
        assert_eq!(Comment::from_value(json!("text")), Comment::default());
        assert_eq!(Post::from_value(json!({"title": "hi"})).title, "hi");
    }

    #[test]
    fn test_annotated_post_flattens_fields() {
        let post: Post = serde_json::from_value(json!({
            "id": "p1",
            "title": "Hello",
            "sentiment_category": "stale",
        }))
        .unwrap();
        let annotated = AnnotatedPost::new(
            post,
            PostSentiment {
                compound: 0.7,
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&annotated).unwrap();
        assert_eq!(value["id"], "p1");
        assert_eq!(value["title"], "Hello");
        assert_eq!(value["sentiment_category"], "positive");
        assert_eq!(value["sentiment"]["compound"], 0.7);
        assert!(value["sentiment"]["title"]["pos"].is_number());
    }

    #[test]
    fn test_empty_batch_result() {
        let result: BatchResult<AnnotatedPost> = BatchResult::empty();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "items": [],
                "topics": [],
                "overall_sentiment": {"compound": 0.0, "positive": 0.0, "neutral": 0.0, "negative": 0.0},
            })
        );
    }
}
