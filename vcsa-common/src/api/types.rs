//! Shared API response types
//!
//! Wire types for the analysis endpoint. Field names are camelCase on the
//! wire (`averageScore`, `mostPositive`, `mostNegative`).

use serde::{Deserialize, Serialize};

/// A single comment with its classification result
///
/// Immutable once constructed; referenced by both the response body and the
/// live event stream without copying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredComment {
    /// Original comment text
    pub text: String,
    /// Classifier label (true = positive)
    pub label: bool,
    /// Classifier confidence score (signed margin; positive = positive sentiment)
    pub score: f64,
}

/// Aggregate statistics over all scored comments of one request
///
/// Only produced when at least one comment was scored. `most_positive` holds
/// the earliest comment with the maximal score, `most_negative` the earliest
/// with the minimal score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// Number of comments scored
    pub count: usize,
    /// Arithmetic mean of all scores, in source order
    pub average_score: f64,
    /// Earliest comment with the highest score
    pub most_positive: ScoredComment,
    /// Earliest comment with the lowest score
    pub most_negative: ScoredComment,
}

/// Success response body for one analysis request
///
/// `summary` is `None` exactly when the video has no comments to score;
/// that case is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSentiment {
    /// Per-comment results in source order
    pub scored: Vec<ScoredComment>,
    /// Aggregate statistics (None when no comments were found)
    pub summary: Option<AggregateSummary>,
}

impl VideoSentiment {
    /// The defined "video has no comments" response
    pub fn empty() -> Self {
        Self {
            scored: Vec::new(),
            summary: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_camel_case() {
        let comment = ScoredComment {
            text: "good video".to_string(),
            label: true,
            score: 0.9,
        };
        let summary = AggregateSummary {
            count: 1,
            average_score: 0.9,
            most_positive: comment.clone(),
            most_negative: comment,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("averageScore").is_some());
        assert!(json.get("mostPositive").is_some());
        assert!(json.get("mostNegative").is_some());
        assert_eq!(json["mostPositive"]["text"], "good video");
    }

    #[test]
    fn empty_response_has_null_summary() {
        let json = serde_json::to_value(VideoSentiment::empty()).unwrap();
        assert!(json["summary"].is_null());
        assert_eq!(json["scored"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn scored_comment_round_trips() {
        let comment = ScoredComment {
            text: "meh".to_string(),
            label: true,
            score: 0.1,
        };
        let json = serde_json::to_string(&comment).unwrap();
        let back: ScoredComment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, comment);
    }
}
