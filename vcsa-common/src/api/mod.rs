//! Shared API types for VCSA

pub mod types;

pub use types::{AggregateSummary, ScoredComment, VideoSentiment};
