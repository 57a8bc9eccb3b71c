//! Configuration loaded from the environment (and an optional `.env` file).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of topics returned per batch.
pub const DEFAULT_TOP_TOPICS: usize = 10;

/// User agent sent to the content platform when none is configured.
pub const DEFAULT_USER_AGENT: &str = "sentiment_analysis_dashboard/1.0";

/// Reddit API credentials. Both halves must be present to use OAuth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditCredentials {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
}

/// Top-level SubPulse configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubPulseConfig {
    /// HTTP bind host.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Application-only OAuth credentials; anonymous access when `None`.
    pub reddit: Option<RedditCredentials>,
    /// User agent for content platform requests.
    pub user_agent: String,
    /// Whether to load the secondary (learned) sentiment classifier.
    pub use_classifier: bool,
    /// Directory holding `model.onnx` and `tokenizer.json` for the classifier.
    pub model_dir: PathBuf,
    /// VADER-format lexicon file; the built-in lexicon is used when unset.
    pub lexicon_path: Option<PathBuf>,
    /// Number of topics returned per analyzed batch.
    pub top_topics: usize,
}

impl Default for SubPulseConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            reddit: None,
            user_agent: DEFAULT_USER_AGENT.into(),
            use_classifier: false,
            model_dir: PathBuf::from("models/sentiment"),
            lexicon_path: None,
            top_topics: DEFAULT_TOP_TOPICS,
        }
    }
}

impl SubPulseConfig {
    /// Create configuration from `.env`, the process environment and defaults.
    pub fn from_env() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("Loaded variables from .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(p) => p
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {}", p)))?,
            None => defaults.port,
        };

        let top_topics = match get("SUBPULSE_TOP_TOPICS") {
            Some(n) => n
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid SUBPULSE_TOP_TOPICS: {}", n)))?,
            None => defaults.top_topics,
        };

        let use_classifier = get("SUBPULSE_USE_CLASSIFIER")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(defaults.use_classifier);

        let reddit = match (get("REDDIT_CLIENT_ID"), get("REDDIT_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => Some(RedditCredentials {
                client_id,
                client_secret,
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!(
                    "Only one of REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET is set; using anonymous access"
                );
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            reddit,
            user_agent: get("REDDIT_USER_AGENT").unwrap_or(defaults.user_agent),
            use_classifier,
            model_dir: get("SUBPULSE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            lexicon_path: get("SUBPULSE_LEXICON_PATH").map(PathBuf::from),
            top_topics,
        })
    }
}
