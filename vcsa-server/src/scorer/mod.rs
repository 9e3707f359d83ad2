//! Sentiment scorer
//!
//! The pipeline depends on scoring only through the [`Scorer`] trait: text
//! in, label and confidence score out. The shipped implementation is a
//! logistic regression over hashed bag-of-words features, trained at
//! startup from a labeled corpus (see [`logistic`] and [`dataset`]).

mod dataset;
mod logistic;

pub use dataset::{Dataset, DatasetError, LabeledExample};
pub use logistic::LogisticScorer;

use thiserror::Error;

/// Classification result for one piece of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted label (true = positive sentiment)
    pub label: bool,
    /// Signed confidence score; positive values indicate positive sentiment,
    /// magnitude indicates confidence
    pub score: f64,
}

/// Error raised by a failed scorer invocation
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The scorer could not produce a prediction for this input
    #[error("scoring failed: {0}")]
    Invocation(String),
}

/// Text classification capability
///
/// Implementations must be side-effect-free and safe to share read-only
/// across requests. Scoring is synchronous; the single-worker dispatch
/// model means at most one call is in flight at a time.
pub trait Scorer: Send + Sync {
    /// Name of this scorer, for logging
    fn name(&self) -> &'static str;

    /// Classify `text`, returning label and confidence score
    fn score(&self, text: &str) -> Result<Prediction, ScoreError>;
}
