//! Reddit HTTP client.
//!
//! Uses application-only OAuth when credentials are configured and the
//! public `.json` endpoints otherwise.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use subpulse_core::config::RedditCredentials;
use subpulse_core::{Comment, Error, Post, Result, SubPulseConfig};

use crate::listing::{parse_comments, parse_listing, parse_posts, parse_subreddit_names, Listing};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_BASE: &str = "https://oauth.reddit.com";
const PUBLIC_BASE: &str = "https://www.reddit.com";

/// Largest page Reddit serves for a single listing request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Refresh the token this long before Reddit says it expires.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: u64,
    error: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

impl CachedToken {
    fn new(value: String, expires_in: Duration, now: Instant) -> Self {
        Self {
            value,
            refresh_at: now + expires_in.saturating_sub(TOKEN_SLACK),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.refresh_at
    }
}

/// Client for the Reddit listing endpoints.
pub struct RedditClient {
    http: Client,
    credentials: Option<RedditCredentials>,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(config: &SubPulseConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;

        if config.reddit.is_some() {
            info!("Reddit client using application-only OAuth");
        } else {
            info!("Reddit credentials not set, using anonymous access");
        }

        Ok(Self {
            http,
            credentials: config.reddit.clone(),
            token: Mutex::new(None),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Hot posts of a subreddit. Each post carries the requested name.
    pub async fn hot_posts(&self, subreddit: &str, limit: usize) -> Result<Vec<Post>> {
        check_segment("subreddit name", subreddit)?;
        let path = format!("/r/{}/hot", subreddit);
        let listings = self.fetch_pages(&path, &[], limit).await?;
        Ok(collect_posts(&listings, Some(subreddit), limit))
    }

    /// Search all of Reddit, most relevant first.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Post>> {
        let params = [
            ("q", query.to_string()),
            ("sort", "relevance".to_string()),
            ("t", "all".to_string()),
            ("restrict_sr", "on".to_string()),
        ];
        let listings = self.fetch_pages("/r/all/search", &params, limit).await?;
        Ok(collect_posts(&listings, None, limit))
    }

    /// Comments of a post, flattened breadth-first.
    pub async fn post_comments(&self, post_id: &str, limit: usize) -> Result<Vec<Comment>> {
        check_segment("post id", post_id)?;
        if limit == 0 {
            return Ok(Vec::new());
        }
        let value = self.get_json(&format!("/comments/{}", post_id), &[]).await?;
        let comments = parse_comments(&value, limit)?;
        debug!("Fetched {} comments for post {}", comments.len(), post_id);
        Ok(comments)
    }

    /// Names of the currently popular subreddits.
    pub async fn trending_subreddits(&self, limit: usize) -> Result<Vec<String>> {
        let listings = self.fetch_pages("/subreddits/popular", &[], limit).await?;
        let mut names: Vec<String> = listings.iter().flat_map(parse_subreddit_names).collect();
        names.truncate(limit);
        Ok(names)
    }

    /// Follow `after` cursors until `limit` children are fetched or the
    /// listing runs out.
    async fn fetch_pages(
        &self,
        path: &str,
        params: &[(&str, String)],
        limit: usize,
    ) -> Result<Vec<Listing>> {
        let mut listings = Vec::new();
        let mut fetched = 0usize;
        let mut after: Option<String> = None;

        while fetched < limit {
            let page_size = (limit - fetched).min(MAX_PAGE_SIZE);
            let mut query: Vec<(&str, String)> = params.to_vec();
            query.push(("limit", page_size.to_string()));
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
            }

            let listing = parse_listing(&self.get_json(path, &query).await?)?;
            let count = listing.data.children.len();
            after = listing.data.after.clone();
            listings.push(listing);
            fetched += count;

            if count == 0 || after.is_none() {
                break;
            }
        }

        debug!("Fetched {} listing children from {}", fetched, path);
        Ok(listings)
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let request = match self.bearer_token().await? {
            Some(token) => self
                .http
                .get(format!("{}{}", OAUTH_BASE, path))
                .header(AUTHORIZATION, format!("Bearer {}", token)),
            None => self.http.get(format!("{}{}.json", PUBLIC_BASE, path)),
        };

        let response = request
            .query(params)
            .query(&[("raw_json", "1")])
            .send()
            .await
            .map_err(|e| Error::Http(format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("Reddit API error {}: {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Source(format!("Invalid JSON from {}: {}", path, e)))
    }

    /// A valid OAuth token, or `None` for anonymous access.
    async fn bearer_token(&self) -> Result<Option<String>> {
        let Some(credentials) = &self.credentials else {
            return Ok(None);
        };

        let now = Instant::now();
        let cached = self
            .token
            .lock()
            .as_ref()
            .filter(|t| t.is_fresh(now))
            .map(|t| t.value.clone());
        if cached.is_some() {
            return Ok(cached);
        }

        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| Error::Http(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("Reddit token error {}: {}", status, body)));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Source(format!("Invalid token response: {}", e)))?;
        let value = match (parsed.access_token, parsed.error) {
            (Some(token), None) => token,
            (_, Some(error)) => return Err(Error::Source(format!("Reddit token error: {}", error))),
            (None, None) => return Err(Error::Source("Token response has no access_token".into())),
        };

        let token = CachedToken::new(value, Duration::from_secs(parsed.expires_in), Instant::now());
        info!("Obtained Reddit access token");
        *self.token.lock() = Some(token.clone());
        Ok(Some(token.value))
    }
}

/// Subreddit names and post ids are ASCII letters, digits and underscores.
/// Anything else could rewrite the request path once interpolated.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn check_segment(what: &str, segment: &str) -> Result<()> {
    if is_safe_segment(segment) {
        Ok(())
    } else {
        Err(Error::Source(format!("Invalid {}: {:?}", what, segment)))
    }
}

fn collect_posts(listings: &[Listing], subreddit: Option<&str>, limit: usize) -> Vec<Post> {
    let mut posts: Vec<Post> = listings
        .iter()
        .flat_map(|l| parse_posts(l, subreddit))
        .collect();
    posts.truncate(limit);
    posts
}
