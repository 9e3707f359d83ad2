//! Scoring and aggregation pipeline
//!
//! Consumes a comment stream, scores each comment, and folds the results
//! into running aggregates while emitting live progress events. Comments
//! are processed strictly in source order; the running extrema replace only
//! on strictly-greater (resp. strictly-less) scores, so the earliest-seen
//! extremal comment wins ties.

use crate::scorer::{ScoreError, Scorer};
use crate::youtube::{CommentStream, FetchError};
use futures::StreamExt;
use thiserror::Error;
use uuid::Uuid;
use vcsa_common::api::{AggregateSummary, ScoredComment, VideoSentiment};
use vcsa_common::{EventBus, VcsaEvent};

/// Pipeline failure modes
///
/// `Fetch` and `Scoring` carry the results scored before the failure;
/// they are reported (count only) and discarded, never returned as a
/// success response.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source yielded no comments; maps to the defined zero-comments
    /// response, not a failure
    #[error("no comments to aggregate")]
    Empty,

    /// The caller abandoned the request; no response will be written
    #[error("request abandoned by caller")]
    Cancelled,

    /// A page fetch failed mid-sequence
    #[error("comment fetch failed: {source}")]
    Fetch {
        source: FetchError,
        partial: Vec<ScoredComment>,
    },

    /// The scorer failed on a comment
    #[error("scoring failed for comment {text:?}: {source}")]
    Scoring {
        text: String,
        source: ScoreError,
        partial: Vec<ScoredComment>,
    },
}

impl PipelineError {
    /// Results scored before the failure, if any
    pub fn partial(&self) -> &[ScoredComment] {
        match self {
            PipelineError::Fetch { partial, .. } | PipelineError::Scoring { partial, .. } => {
                partial
            }
            _ => &[],
        }
    }
}

/// Score and aggregate one request's comment stream
///
/// Pulls comments one at a time, scores each synchronously, appends it to
/// the output list, folds it into the running reducers (sum, count,
/// extrema), and emits a `CommentScored` event. Emission is fire-and-forget.
///
/// `cancelled` is checked between items; an in-flight page fetch is allowed
/// to complete.
pub async fn process<F>(
    mut source: CommentStream,
    scorer: &dyn Scorer,
    events: &EventBus,
    request_id: Uuid,
    video_id: &str,
    cancelled: F,
) -> Result<VideoSentiment, PipelineError>
where
    F: Fn() -> bool,
{
    let mut scored: Vec<ScoredComment> = Vec::new();
    let mut sum = 0.0f64;
    let mut most_positive: Option<usize> = None;
    let mut most_negative: Option<usize> = None;

    loop {
        if cancelled() {
            return Err(PipelineError::Cancelled);
        }
        let Some(item) = source.next().await else {
            break;
        };

        let comment = match item {
            Ok(comment) => comment,
            Err(source) => {
                return Err(PipelineError::Fetch {
                    source,
                    partial: scored,
                });
            }
        };

        let prediction = match scorer.score(&comment.text) {
            Ok(prediction) => prediction,
            Err(source) => {
                return Err(PipelineError::Scoring {
                    text: comment.text,
                    source,
                    partial: scored,
                });
            }
        };

        let index = scored.len();
        let item = ScoredComment {
            text: comment.text,
            label: prediction.label,
            score: prediction.score,
        };

        sum += item.score;
        // Strict comparisons: ties keep the earliest-seen extremal comment
        match most_positive {
            Some(best) if item.score <= scored[best].score => {}
            _ => most_positive = Some(index),
        }
        match most_negative {
            Some(worst) if item.score >= scored[worst].score => {}
            _ => most_negative = Some(index),
        }

        events.emit_lossy(VcsaEvent::CommentScored {
            request_id,
            video_id: video_id.to_string(),
            index,
            text: item.text.clone(),
            label: item.label,
            score: item.score,
            timestamp: chrono::Utc::now(),
        });
        scored.push(item);
    }

    let (Some(best), Some(worst)) = (most_positive, most_negative) else {
        return Err(PipelineError::Empty);
    };

    let count = scored.len();
    let summary = AggregateSummary {
        count,
        average_score: sum / count as f64,
        most_positive: scored[best].clone(),
        most_negative: scored[worst].clone(),
    };

    Ok(VideoSentiment {
        scored,
        summary: Some(summary),
    })
}
