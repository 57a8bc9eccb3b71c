//! Reddit listing JSON to domain items.
//!
//! Pure functions over already-fetched JSON so they can be tested without
//! the network.

use std::collections::VecDeque;

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use subpulse_core::{Comment, Error, Post, Result};

/// Author string used when the account is deleted or missing.
pub const MISSING_AUTHOR: &str = "None";

/// Timestamp format for `created_utc`.
pub const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    #[serde(default)]
    pub after: Option<String>,
}

/// A listing child: `t1` comment, `t3` link, `t5` subreddit, or `more`.
#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

pub fn parse_listing(value: &Value) -> Result<Listing> {
    Listing::deserialize(value).map_err(|e| Error::Source(format!("malformed listing: {}", e)))
}

/// Epoch seconds to `%Y-%m-%dT%H:%M:%S` (UTC). Missing or invalid yields "".
pub fn format_created_utc(epoch: Option<f64>) -> String {
    epoch
        .filter(|e| e.is_finite())
        .and_then(|e| DateTime::from_timestamp(e.trunc() as i64, 0))
        .map(|dt| dt.format(CREATED_FORMAT).to_string())
        .unwrap_or_default()
}

fn str_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn int_field(data: &Value, key: &str) -> i64 {
    data.get(key)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

fn author_field(data: &Value) -> String {
    match data.get("author").and_then(Value::as_str) {
        Some(a) if !a.is_empty() && a != "[deleted]" => a.to_string(),
        _ => MISSING_AUTHOR.to_string(),
    }
}

fn post_from(data: &Value, subreddit: Option<&str>) -> Post {
    Post {
        id: str_field(data, "id"),
        title: str_field(data, "title"),
        text: str_field(data, "selftext"),
        score: int_field(data, "score"),
        num_comments: int_field(data, "num_comments"),
        created_utc: format_created_utc(data.get("created_utc").and_then(Value::as_f64)),
        url: str_field(data, "url"),
        author: author_field(data),
        subreddit: subreddit
            .map(str::to_string)
            .unwrap_or_else(|| str_field(data, "subreddit")),
        extra: Default::default(),
    }
}

fn comment_from(data: &Value) -> Comment {
    Comment {
        id: str_field(data, "id"),
        text: str_field(data, "body"),
        score: int_field(data, "score"),
        created_utc: format_created_utc(data.get("created_utc").and_then(Value::as_f64)),
        author: author_field(data),
        extra: Default::default(),
    }
}

/// Posts (`t3` children) of a listing, in listing order.
///
/// `subreddit` overrides the per-post subreddit name, matching the name the
/// caller asked for.
pub fn parse_posts(listing: &Listing, subreddit: Option<&str>) -> Vec<Post> {
    listing
        .data
        .children
        .iter()
        .filter(|t| t.kind == "t3")
        .map(|t| post_from(&t.data, subreddit))
        .collect()
}

/// Replies of a comment, which Reddit sends as `""` when there are none.
fn replies(data: &Value) -> Vec<Thing> {
    data.get("replies")
        .filter(|r| r.is_object())
        .and_then(|r| Listing::deserialize(r).ok())
        .map(|l| l.data.children)
        .unwrap_or_default()
}

/// Flatten a comment tree breadth-first, dropping `more` stubs.
///
/// Takes the `[link, comments]` pair returned by `/comments/{id}` and keeps
/// at most `limit` comments.
pub fn parse_comments(value: &Value, limit: usize) -> Result<Vec<Comment>> {
    let tree = value
        .as_array()
        .and_then(|pair| pair.get(1))
        .ok_or_else(|| Error::Source("comment response is not a [link, comments] pair".into()))?;

    let mut queue: VecDeque<Thing> = parse_listing(tree)?.data.children.into();
    let mut comments = Vec::new();

    while let Some(thing) = queue.pop_front() {
        if comments.len() >= limit {
            break;
        }
        if thing.kind != "t1" {
            continue;
        }
        comments.push(comment_from(&thing.data));
        queue.extend(replies(&thing.data));
    }

    Ok(comments)
}

/// Display names of a subreddit listing.
pub fn parse_subreddit_names(listing: &Listing) -> Vec<String> {
    listing
        .data
        .children
        .iter()
        .filter(|t| t.kind == "t5")
        .filter_map(|t| t.data.get("display_name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hot_fixture() -> Value {
        json!({
            "kind": "Listing",
            "data": {
                "after": "t3_b2",
                "children": [
                    {"kind": "t3", "data": {
                        "id": "a1", "title": "Rust 2024 edition is out", "selftext": "",
                        "score": 1520, "num_comments": 311, "created_utc": 1700000000.0,
                        "url": "https://blog.rust-lang.org", "author": "ferris",
                        "subreddit": "rust"
                    }},
                    {"kind": "t3", "data": {
                        "id": "b2", "title": "Help with lifetimes", "selftext": "Why?",
                        "score": 3, "num_comments": 0, "created_utc": 1700000061,
                        "url": "https://reddit.com/r/rust/b2", "author": "[deleted]",
                        "subreddit": "rust"
                    }}
                ]
            }
        })
    }

    #[test]
    fn test_parse_posts() {
        let listing = parse_listing(&hot_fixture()).unwrap();
        assert_eq!(listing.data.after.as_deref(), Some("t3_b2"));

        let posts = parse_posts(&listing, Some("Rust"));
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "a1");
        assert_eq!(posts[0].text, "");
        assert_eq!(posts[0].score, 1520);
        assert_eq!(posts[0].num_comments, 311);
        assert_eq!(posts[0].created_utc, "2023-11-14T22:13:20");
        assert_eq!(posts[0].subreddit, "Rust");
        assert_eq!(posts[1].text, "Why?");
        assert_eq!(posts[1].author, "None");
        assert_eq!(posts[1].created_utc, "2023-11-14T22:14:21");

        let searched = parse_posts(&listing, None);
        assert_eq!(searched[0].subreddit, "rust");
    }

    #[test]
    fn test_malformed_listing() {
        let err = parse_listing(&json!({"kind": "Listing"})).unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }

    #[test]
    fn test_created_utc_missing() {
        assert_eq!(format_created_utc(None), "");
        assert_eq!(format_created_utc(Some(f64::NAN)), "");
        assert_eq!(format_created_utc(Some(0.0)), "1970-01-01T00:00:00");
    }

    fn comment(id: &str, body: &str, replies: Value) -> Value {
        json!({"kind": "t1", "data": {
            "id": id, "body": body, "score": 1, "created_utc": 1700000000.0,
            "author": "someone", "replies": replies
        }})
    }

    fn comments_fixture() -> Value {
        let nested = json!({"kind": "Listing", "data": {"children": [
            comment("c1a", "reply one", json!("")),
            {"kind": "more", "data": {"count": 4, "children": ["x", "y"]}}
        ]}});
        json!([
            {"kind": "Listing", "data": {"children": [{"kind": "t3", "data": {"id": "p"}}]}},
            {"kind": "Listing", "data": {"children": [
                comment("c1", "top one", nested),
                comment("c2", "top two", json!("")),
                {"kind": "more", "data": {"count": 10}}
            ]}}
        ])
    }

    #[test]
    fn test_parse_comments_breadth_first() {
        let comments = parse_comments(&comments_fixture(), 100).unwrap();
        let ids: Vec<&str> = comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c1a"]);
        assert_eq!(comments[2].text, "reply one");
        assert_eq!(comments[0].author, "someone");
    }

    #[test]
    fn test_parse_comments_limit() {
        let comments = parse_comments(&comments_fixture(), 2).unwrap();
        assert_eq!(comments.len(), 2);
        assert!(parse_comments(&comments_fixture(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_comments_rejects_non_pair() {
        assert!(parse_comments(&json!({"data": {}}), 10).is_err());
    }

    #[test]
    fn test_parse_subreddit_names() {
        let value = json!({"kind": "Listing", "data": {"children": [
            {"kind": "t5", "data": {"display_name": "AskReddit"}},
            {"kind": "t5", "data": {"display_name": "worldnews"}},
            {"kind": "t5", "data": {}}
        ]}});
        let names = parse_subreddit_names(&parse_listing(&value).unwrap());
        assert_eq!(names, vec!["AskReddit", "worldnews"]);
    }
}
