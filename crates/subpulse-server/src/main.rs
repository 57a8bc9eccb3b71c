//! SubPulse: Reddit sentiment and topic analysis server.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use subpulse_analyze::{Analyzer, TextScorers};
use subpulse_core::SubPulseConfig;
use subpulse_server::{build_router, AppState};
use subpulse_source::RedditClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if let Some(arg) = args.get(1) {
        match arg.as_str() {
            "--help" | "-h" | "help" => {
                println!("SubPulse: Reddit sentiment and topic analysis API");
                println!();
                println!("Usage: subpulse");
                println!();
                println!("Environment:");
                println!("  HOST, PORT                     Bind address (0.0.0.0:8000)");
                println!("  REDDIT_CLIENT_ID/SECRET        OAuth credentials (anonymous if unset)");
                println!("  REDDIT_USER_AGENT              User agent for Reddit requests");
                println!("  SUBPULSE_USE_CLASSIFIER        Load the ONNX classifier (false)");
                println!("  SUBPULSE_MODEL_DIR             Classifier model directory");
                println!("  SUBPULSE_LEXICON_PATH          VADER-format lexicon file");
                println!("  SUBPULSE_TOP_TOPICS            Topics per batch (10)");
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}. Use 'subpulse help' for usage.", other);
                std::process::exit(1);
            }
        }
    }

    let config = SubPulseConfig::from_env()?;

    let scorers = TextScorers::from_config(&config)?;
    let analyzer = Analyzer::new(scorers).with_top_n(config.top_topics);
    info!(
        "Analyzer ready: classifier={}, top_topics={}",
        analyzer.has_classifier(),
        analyzer.top_n()
    );

    let reddit = RedditClient::new(&config)?;

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, analyzer, reddit));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("SubPulse server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
