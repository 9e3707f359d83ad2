//! YouTube comment source
//!
//! Fetches top-level comments for a video from the YouTube Data API v3
//! `commentThreads` endpoint and exposes them as a lazy, bounded stream.
//!
//! The stream is purely pull-driven: a page is requested only when the
//! consumer polls past the previous page's items, so at most one page fetch
//! is ever in flight and dropping the stream abandons the sequence. The
//! sequence ends as soon as the requested bound is reached (even mid-page,
//! in which case the next page is never requested) or the API stops
//! returning a continuation token.
//!
//! # API Reference
//! - Endpoint: https://www.googleapis.com/youtube/v3/commentThreads
//! - Documentation: https://developers.google.com/youtube/v3/docs/commentThreads/list

use futures::future::BoxFuture;
use futures::stream::Stream;
use futures::FutureExt;
use reqwest::Client;
use serde::Deserialize;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// YouTube Data API base URL
const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Comments requested per page (API maximum for commentThreads)
const PAGE_SIZE: usize = 100;

/// Default timeout for API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// A single comment, as produced by a [`CommentSource`]
///
/// Ephemeral: exists only within one request's processing lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Original comment text
    pub text: String,
}

/// Error raised by a failed page fetch
///
/// Carries enough context to identify which fetch of which video failed.
/// Items yielded before the failure are not retracted.
#[derive(Debug, Error)]
#[error("comment fetch for video '{video_id}' failed on page {page}: {kind}")]
pub struct FetchError {
    /// Video whose comments were being fetched
    pub video_id: String,
    /// 0-based index of the page that failed
    pub page: usize,
    /// Underlying cause
    #[source]
    pub kind: FetchErrorKind,
}

/// Cause of a [`FetchError`]
#[derive(Debug, Error)]
pub enum FetchErrorKind {
    /// Request could not be sent or the connection failed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API responded with a non-success status
    #[error("API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected schema
    #[error("decode error: {0}")]
    Decode(String),
}

/// Lazy sequence of comments
///
/// Finite and non-restartable; yields at most the requested number of items
/// in API order, then terminates. A fetch failure is yielded as the final
/// item.
pub type CommentStream = Pin<Box<dyn Stream<Item = Result<Comment, FetchError>> + Send>>;

/// Source of comments for a video
///
/// Seam between the dispatcher and the external comment API; test code
/// substitutes scripted implementations.
pub trait CommentSource: Send + Sync {
    /// Produce a lazy stream of at most `max_results` comments
    ///
    /// `max_results == 0` must yield an empty stream without touching the
    /// network. A video with no comments yields an empty stream, not an
    /// error.
    fn fetch(&self, video_id: &str, max_results: usize) -> CommentStream;
}

// ============================================================================
// YouTube client
// ============================================================================

/// YouTube Data API client
///
/// Cheap to clone (shares the underlying connection pool). No automatic
/// retries: a failed page fetch fails the sequence.
#[derive(Clone)]
pub struct YouTubeClient {
    http_client: Client,
    api_key: String,
}

impl YouTubeClient {
    /// Create a new client with the given API credential
    pub fn new(api_key: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
        }
    }

    /// Fetch one page of comment threads
    ///
    /// The `page_token` parameter is omitted entirely on the first call.
    async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, FetchErrorKind> {
        let mut request = self
            .http_client
            .get(format!("{}/commentThreads", YOUTUBE_API_URL))
            .query(&[
                ("part", "snippet"),
                ("videoId", video_id),
                ("key", self.api_key.as_str()),
            ])
            .query(&[("maxResults", PAGE_SIZE.to_string())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(FetchErrorKind::Api { status, message });
        }

        response
            .json::<CommentPage>()
            .await
            .map_err(|e| FetchErrorKind::Decode(e.to_string()))
    }
}

impl CommentSource for YouTubeClient {
    fn fetch(&self, video_id: &str, max_results: usize) -> CommentStream {
        let client = self.clone();
        let video_id = video_id.to_string();
        let fetch_id = video_id.clone();
        paginate(video_id, max_results, move |_page, token| {
            let client = client.clone();
            let video_id = fetch_id.clone();
            async move { client.fetch_page(&video_id, token.as_deref()).await }.boxed()
        })
    }
}

// ============================================================================
// Pagination driver
// ============================================================================

/// Drive a page-fetching function into a bounded comment stream
///
/// Shared between the live client and tests; owns the cursor for the
/// duration of one fetch operation. Stops as soon as either `max_results`
/// items were yielded (mid-page included) or a page carries no continuation
/// token.
fn paginate<F>(video_id: String, max_results: usize, mut fetch_page: F) -> CommentStream
where
    F: FnMut(usize, Option<String>) -> BoxFuture<'static, Result<CommentPage, FetchErrorKind>>
        + Send
        + 'static,
{
    if max_results == 0 {
        return Box::pin(futures::stream::empty());
    }

    Box::pin(async_stream::stream! {
        let mut remaining = max_results;
        let mut page_token: Option<String> = None;
        let mut page = 0usize;

        loop {
            debug!(video_id = %video_id, page, "Requesting comment page");
            let body = match fetch_page(page, page_token.take()).await {
                Ok(body) => body,
                Err(kind) => {
                    yield Err(FetchError { video_id: video_id.clone(), page, kind });
                    return;
                }
            };
            debug!(
                video_id = %video_id,
                page,
                items = body.items.len(),
                has_next = body.next_page_token.is_some(),
                "Comment page received"
            );

            for item in body.items {
                yield Ok(Comment {
                    text: item.snippet.top_level_comment.snippet.text_original,
                });
                remaining -= 1;
                if remaining == 0 {
                    // Bound reached mid-page; the next page is never requested
                    return;
                }
            }

            match body.next_page_token {
                Some(token) => page_token = Some(token),
                None => return,
            }
            page += 1;
        }
    })
}

// ============================================================================
// YouTube API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct CommentPage {
    #[serde(default)]
    items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "textOriginal")]
    text_original: String,
}

// ============================================================================
// Tests
// ============================================================================
