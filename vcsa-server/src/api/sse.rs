//! Server-Sent Events endpoint for live analysis progress
//!
//! Streams every `VcsaEvent` emitted by the pipeline: per-comment scores as
//! they are computed, plus request start/completion/failure markers.

use crate::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /events - SSE stream of live analysis events
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    vcsa_common::sse::event_sse_stream(&state.events, "vcsa-server")
}
