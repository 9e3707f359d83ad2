//! Single-worker request dispatch
//!
//! Connections are accepted concurrently by the HTTP layer, but every
//! request's business logic (fetch, score, fold) runs on one dedicated
//! worker task fed by a bounded queue. At most one external-API fetch and
//! one scoring pass are in flight at any time; queued requests wait rather
//! than being dropped. A single request's failure is contained: it is
//! reported to that request's caller only and the worker keeps serving.

use crate::pipeline::{self, PipelineError};
use crate::scorer::Scorer;
use crate::youtube::CommentSource;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use vcsa_common::api::VideoSentiment;
use vcsa_common::{EventBus, VcsaEvent};

/// Queued requests before enqueueing applies backpressure
const QUEUE_DEPTH: usize = 64;

/// One queued analysis request
struct AnalysisJob {
    request_id: Uuid,
    video_id: String,
    max_results: usize,
    reply: oneshot::Sender<Result<VideoSentiment, PipelineError>>,
}

/// Dispatch failure as seen by the HTTP handler
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request's pipeline failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The worker task is gone; the service cannot process requests
    #[error("analysis worker unavailable")]
    WorkerGone,
}

/// Handle to the analysis worker
///
/// Cheap to clone; all clones feed the same worker.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<AnalysisJob>,
}

impl Dispatcher {
    /// Spawn the worker task and return a handle to it
    pub fn spawn(
        source: Arc<dyn CommentSource>,
        scorer: Arc<dyn Scorer>,
        events: EventBus,
    ) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        tokio::spawn(worker_loop(rx, source, scorer, events));
        Self { tx }
    }

    /// Run one analysis request through the worker
    ///
    /// Queues the request (waiting if the queue is full) and awaits the
    /// outcome. The zero-comments case is already mapped to the defined
    /// empty response.
    pub async fn analyze(
        &self,
        video_id: String,
        max_results: usize,
    ) -> Result<VideoSentiment, DispatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = AnalysisJob {
            request_id: Uuid::new_v4(),
            video_id,
            max_results,
            reply: reply_tx,
        };

        self.tx
            .send(job)
            .await
            .map_err(|_| DispatchError::WorkerGone)?;

        match reply_rx.await {
            Ok(outcome) => outcome.map_err(DispatchError::Pipeline),
            Err(_) => Err(DispatchError::WorkerGone),
        }
    }
}

/// Worker loop: drains the queue one request at a time
async fn worker_loop(
    mut rx: mpsc::Receiver<AnalysisJob>,
    source: Arc<dyn CommentSource>,
    scorer: Arc<dyn Scorer>,
    events: EventBus,
) {
    info!("Analysis worker started");

    while let Some(job) = rx.recv().await {
        let AnalysisJob {
            request_id,
            video_id,
            max_results,
            reply,
        } = job;

        if reply.is_closed() {
            debug!(%request_id, %video_id, "Caller gone before processing, job skipped");
            continue;
        }

        info!(%request_id, %video_id, max_results, "Analysis started");
        events.emit_lossy(VcsaEvent::AnalysisStarted {
            request_id,
            video_id: video_id.clone(),
            timestamp: chrono::Utc::now(),
        });

        let stream = source.fetch(&video_id, max_results);
        let cancelled = || reply.is_closed();
        let result = pipeline::process(
            stream,
            scorer.as_ref(),
            &events,
            request_id,
            &video_id,
            cancelled,
        )
        .await;

        match result {
            Ok(outcome) => {
                let summary = outcome.summary.as_ref();
                info!(
                    %request_id,
                    %video_id,
                    count = outcome.scored.len(),
                    average_score = summary.map(|s| s.average_score),
                    "Analysis completed"
                );
                events.emit_lossy(VcsaEvent::AnalysisCompleted {
                    request_id,
                    video_id,
                    count: outcome.scored.len(),
                    average_score: summary.map(|s| s.average_score),
                    timestamp: chrono::Utc::now(),
                });
                let _ = reply.send(Ok(outcome));
            }
            Err(PipelineError::Empty) => {
                info!(%request_id, %video_id, "Video has no comments");
                events.emit_lossy(VcsaEvent::AnalysisCompleted {
                    request_id,
                    video_id,
                    count: 0,
                    average_score: None,
                    timestamp: chrono::Utc::now(),
                });
                let _ = reply.send(Ok(VideoSentiment::empty()));
            }
            Err(PipelineError::Cancelled) => {
                debug!(%request_id, %video_id, "Caller gone, analysis abandoned");
            }
            Err(err) => {
                if !err.partial().is_empty() {
                    warn!(
                        %request_id,
                        discarded = err.partial().len(),
                        "Partial results discarded after failure"
                    );
                }
                error!(%request_id, %video_id, error = %err, "Analysis failed");
                events.emit_lossy(VcsaEvent::AnalysisFailed {
                    request_id,
                    video_id,
                    error: err.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                let _ = reply.send(Err(err));
            }
        }
    }

    info!("Analysis worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{Prediction, ScoreError};
    use crate::youtube::{Comment, CommentStream, FetchError, FetchErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source scripted per video id: "bad" videos fail on the first page,
    /// others yield one comment per character of the id.
    struct ScriptedSource {
        calls: AtomicUsize,
    }

    impl CommentSource for ScriptedSource {
        fn fetch(&self, video_id: &str, max_results: usize) -> CommentStream {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if video_id == "bad" {
                let err = FetchError {
                    video_id: video_id.to_string(),
                    page: 0,
                    kind: FetchErrorKind::Api {
                        status: 500,
                        message: "boom".to_string(),
                    },
                };
                return Box::pin(futures::stream::iter(vec![Err(err)]));
            }
            let items: Vec<Result<Comment, FetchError>> = video_id
                .chars()
                .take(max_results)
                .map(|c| {
                    Ok(Comment {
                        text: c.to_string(),
                    })
                })
                .collect();
            Box::pin(futures::stream::iter(items))
        }
    }

    struct ConstScorer;

    impl Scorer for ConstScorer {
        fn name(&self) -> &'static str {
            "const"
        }

        fn score(&self, text: &str) -> Result<Prediction, ScoreError> {
            let score = text.len() as f64 * 0.1;
            Ok(Prediction {
                label: score > 0.0,
                score,
            })
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::spawn(
            Arc::new(ScriptedSource {
                calls: AtomicUsize::new(0),
            }),
            Arc::new(ConstScorer),
            EventBus::new(64),
        )
    }

    #[tokio::test]
    async fn analyze_returns_scored_outcome() {
        let outcome = dispatcher().analyze("abc".to_string(), 100).await.unwrap();
        assert_eq!(outcome.scored.len(), 3);
        assert_eq!(outcome.summary.unwrap().count, 3);
    }

    #[tokio::test]
    async fn bound_limits_scored_comments() {
        let outcome = dispatcher().analyze("abcdef".to_string(), 2).await.unwrap();
        assert_eq!(outcome.scored.len(), 2);
    }

    #[tokio::test]
    async fn zero_bound_maps_to_empty_response() {
        let outcome = dispatcher().analyze("abc".to_string(), 0).await.unwrap();
        assert!(outcome.scored.is_empty());
        assert!(outcome.summary.is_none());
    }

    #[tokio::test]
    async fn failure_is_contained_and_worker_survives() {
        let dispatcher = dispatcher();

        let err = dispatcher
            .analyze("bad".to_string(), 100)
            .await
            .expect_err("fetch failure must surface");
        assert!(matches!(
            err,
            DispatchError::Pipeline(PipelineError::Fetch { .. })
        ));

        // The worker must still serve subsequent requests
        let outcome = dispatcher.analyze("ok".to_string(), 100).await.unwrap();
        assert_eq!(outcome.scored.len(), 2);
    }

    #[tokio::test]
    async fn requests_are_served_in_submission_order() {
        let dispatcher = dispatcher();
        let first = dispatcher.analyze("aa".to_string(), 100);
        let second = dispatcher.analyze("bbb".to_string(), 100);
        let (first, second) = tokio::join!(first, second);
        assert_eq!(first.unwrap().scored.len(), 2);
        assert_eq!(second.unwrap().scored.len(), 3);
    }
}
