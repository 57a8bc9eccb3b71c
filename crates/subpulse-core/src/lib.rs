//! SubPulse Core: shared domain types, configuration, errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::SubPulseConfig;
pub use error::{Error, Result};
pub use types::{
    AnnotatedComment, AnnotatedPost, BatchResult, Comment, OverallSentiment, PolarityScore,
    Post, PostSentiment, Scored, SentimentCategory, Topic,
};
