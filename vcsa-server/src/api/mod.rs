//! HTTP API handlers for vcsa-server

pub mod analyze;
pub mod health;
pub mod sse;

pub use analyze::analyze_video;
pub use health::health_routes;
pub use sse::event_stream;
