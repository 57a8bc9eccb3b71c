//! Secondary sentiment classifier trait.
//!
//! A classifier produces a single label with a confidence for a text. It is
//! optional: the analysis pipeline holds an `Option<Arc<dyn SentimentClassifier>>`
//! resolved once at startup, and a failed call only drops the extra fields.

use serde::{Deserialize, Serialize};
use subpulse_core::Result;

/// Default maximum input length, in characters.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 512;

/// Label and confidence produced by a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

/// Trait for learned sentiment backends.
pub trait SentimentClassifier: Send + Sync {
    /// Classify a text. Callers truncate to `max_input_chars` first.
    fn classify(&self, text: &str) -> Result<Classification>;

    /// Longest input, in characters, the backend accepts.
    fn max_input_chars(&self) -> usize {
        DEFAULT_MAX_INPUT_CHARS
    }

    /// Backend name for logs and health output.
    fn name(&self) -> &str;
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
