// src/session/countdown.rs

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Mutex, task::JoinHandle};

use super::{AttemptSession, Submission, Tick};
use crate::models::attempt::AttemptResult;

pub type SharedSession = Arc<Mutex<AttemptSession>>;

/// Where sealed submissions are sent for grading.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn deliver(&self, submission: &Submission) -> Result<AttemptResult, Self::Error>;
}

#[derive(Debug, Clone)]
pub struct Delivered {
    pub result: AttemptResult,
    /// False when the session moved on before the result arrived; the result was
    /// then not stored in the session.
    pub current: bool,
}

async fn deliver<S: SubmissionSink + ?Sized>(
    session: &SharedSession,
    sink: &S,
    submission: Submission,
) -> Result<Delivered, S::Error> {
    let result = sink.deliver(&submission).await.map_err(|e| {
        tracing::warn!(quiz_id = submission.quiz_id, "submission failed: {}", e);
        e
    })?;

    let current = session
        .lock()
        .await
        .record_result(submission.generation, result.clone());
    if !current {
        tracing::debug!(
            quiz_id = submission.quiz_id,
            "discarding result for a superseded attempt"
        );
    }

    Ok(Delivered { result, current })
}

/// Manual submission. Returns `Ok(None)` when the attempt was already sealed,
/// by an earlier click or by the clock.
pub async fn submit_now<S: SubmissionSink + ?Sized>(
    session: &SharedSession,
    sink: &S,
) -> Result<Option<Delivered>, S::Error> {
    let submission = session.lock().await.submit();
    match submission {
        Some(submission) => deliver(session, sink, submission).await.map(Some),
        None => Ok(None),
    }
}

/// Ticks the session once per `period` until its clock runs out, then delivers
/// the expiry submission.
///
/// The generation to drive is fixed before the task is spawned, so a restart or
/// reset that lands before the task first runs still detaches it. The task ends
/// with `Ok(None)` if the attempt is sealed manually, reset, or restarted before
/// expiry.
pub async fn spawn_countdown<S>(
    session: SharedSession,
    sink: Arc<S>,
    period: Duration,
) -> JoinHandle<Result<Option<Delivered>, S::Error>>
where
    S: SubmissionSink + 'static,
{
    let generation = session.lock().await.generation();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            let tick = {
                let mut guard = session.lock().await;
                if guard.generation() != generation {
                    return Ok(None);
                }
                guard.tick()
            };

            match tick {
                Tick::Running { .. } => continue,
                Tick::Expired(submission) => {
                    tracing::info!(quiz_id = submission.quiz_id, "time is up, submitting");
                    return deliver(&session, sink.as_ref(), submission).await.map(Some);
                }
                Tick::Inactive => return Ok(None),
            }
        }
    })
}
