//! Shared application state.

use subpulse_analyze::Analyzer;
use subpulse_core::SubPulseConfig;
use subpulse_source::RedditClient;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: SubPulseConfig,
    pub analyzer: Analyzer,
    pub reddit: RedditClient,
}

impl AppState {
    pub fn new(config: SubPulseConfig, analyzer: Analyzer, reddit: RedditClient) -> Self {
        Self {
            config,
            analyzer,
            reddit,
        }
    }
}
