//! SubPulse Source: Reddit posts and comments as pipeline items.

pub mod client;
pub mod listing;

pub use client::{is_safe_segment, RedditClient};
pub use listing::{format_created_utc, parse_comments, parse_listing, parse_posts, parse_subreddit_names};
