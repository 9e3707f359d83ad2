//! Server-Sent Events (SSE) utilities
//!
//! Bridges an [`EventBus`] subscription onto an axum SSE response.

use crate::events::EventBus;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Heartbeat interval for idle SSE connections
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Create an SSE stream that forwards all events from the bus
///
/// Sends an initial `ConnectionStatus` event, then every [`crate::VcsaEvent`]
/// emitted after subscription, serialized as JSON with the variant name as
/// the SSE event name. Heartbeat comments keep idle connections alive.
///
/// A lagging client drops events rather than slowing down emitters.
///
/// # Example
/// ```rust,ignore
/// pub async fn event_stream(
///     State(state): State<AppState>,
/// ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     vcsa_common::sse::event_sse_stream(&state.events, "vcsa-server")
/// }
/// ```
pub fn event_sse_stream(
    bus: &EventBus,
    service_name: &'static str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected to {} events", service_name);

    let mut rx = bus.subscribe();
    let stream = async_stream::stream! {
        // Initial connected status
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            match tokio::time::timeout(HEARTBEAT_INTERVAL, rx.recv()).await {
                Ok(Ok(event)) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        yield Ok(Event::default().event(event.event_name()).data(json));
                    }
                    Err(e) => {
                        warn!("SSE: failed to serialize event: {}", e);
                    }
                },
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    warn!(skipped, "SSE: client lagged, events dropped");
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    debug!("SSE: event bus closed, ending stream");
                    break;
                }
                Err(_elapsed) => {
                    debug!("SSE: sending heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(HEARTBEAT_INTERVAL)
            .text("heartbeat"),
    )
}
