//! vcsa-server - Video Comment Sentiment Analyzer
//!
//! Fetches YouTube comments for a video, scores each with a binary
//! sentiment classifier, and serves per-comment results plus aggregate
//! statistics over a single HTTP endpoint. Live per-comment progress is
//! available via SSE on /events.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use vcsa_common::EventBus;
use vcsa_server::config::{Cli, Config};
use vcsa_server::dispatch::Dispatcher;
use vcsa_server::scorer::{Dataset, LogisticScorer, Scorer};
use vcsa_server::youtube::{CommentSource, YouTubeClient};
use vcsa_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting VCSA server (vcsa-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = Config::resolve(Cli::parse())?;
    info!("Max comments per request: {}", config.max_results);

    // Train the classifier before accepting traffic
    let dataset = match &config.dataset_path {
        Some(path) => {
            info!("Loading sentiment corpus from {}", path.display());
            Dataset::load(path)?
        }
        None => {
            info!("Using embedded sentiment corpus");
            Dataset::embedded()?
        }
    };
    let scorer: Arc<dyn Scorer> = Arc::new(LogisticScorer::train(&dataset));

    let source: Arc<dyn CommentSource> = Arc::new(YouTubeClient::new(config.api_key.clone()));
    let events = EventBus::new(100);
    let dispatcher = Dispatcher::spawn(source, scorer, events.clone());

    let state = AppState::new(dispatcher, events, config.max_results);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("Listening on http://{}", config.listen_addr);
    info!("Health check: http://{}/health", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
