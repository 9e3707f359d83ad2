//! Comment analysis endpoint
//!
//! `GET /?videoId=...` (also mounted at `/analyze`). Validation happens
//! here, before the request is queued: a missing or empty `videoId` is
//! rejected without ever touching the comment source.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use vcsa_common::api::VideoSentiment;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for the analysis endpoint
#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    /// Video whose comments to analyze (required)
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    /// Per-request comment bound; clamped to `[0, configured ceiling]`
    #[serde(rename = "maxResults")]
    pub max_results: Option<i64>,
}

/// GET / and GET /analyze
///
/// Fetches up to the bounded number of comments for `videoId`, scores each
/// one, and returns the scored list plus aggregate summary. A video with no
/// comments yields `scored: []` with a null summary.
pub async fn analyze_video(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> ApiResult<Json<VideoSentiment>> {
    let video_id = match query.video_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return Err(ApiError::BadRequest(
                "Missing videoId parameter".to_string(),
            ));
        }
    };

    // Non-positive bounds clamp to zero (defined empty outcome, no fetch)
    let max_results = match query.max_results {
        Some(n) => n.clamp(0, state.max_results as i64) as usize,
        None => state.max_results,
    };

    info!(%video_id, max_results, "Received analysis request");

    let outcome = state.dispatcher.analyze(video_id, max_results).await?;
    Ok(Json(outcome))
}
