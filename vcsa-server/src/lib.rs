//! vcsa-server library - Video Comment Sentiment Analyzer
//!
//! Single-endpoint HTTP service: fetches a bounded number of comments for a
//! video from the YouTube Data API, scores each with a binary sentiment
//! classifier, and returns per-comment results plus aggregate statistics.
//! Connections are accepted concurrently; business logic is serialized on a
//! single dispatch worker.

use axum::Router;

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod scorer;
pub mod youtube;

use dispatch::Dispatcher;
use vcsa_common::EventBus;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Handle to the single analysis worker
    pub dispatcher: Dispatcher,
    /// Event bus feeding the SSE endpoint
    pub events: EventBus,
    /// Ceiling for per-request comment bounds
    pub max_results: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(dispatcher: Dispatcher, events: EventBus, max_results: usize) -> Self {
        Self {
            dispatcher,
            events,
            max_results,
        }
    }
}

/// Build application router
///
/// The analysis endpoint is mounted at both `/` (the primary surface) and
/// `/analyze`; `/health` and `/events` are exact-match routes.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::analyze_video))
        .route("/analyze", get(api::analyze_video))
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .with_state(state)
}
