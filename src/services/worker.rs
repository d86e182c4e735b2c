use sqlx::PgPool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use crate::db::queries;
use crate::models::highlight::HighlightDraft;
use crate::models::matches::{Match, MatchStatus};
use crate::services::processor::{ProcessingError, Processor};
use crate::services::queue::{JobDescriptor, JobQueue, QueueError};

/// Transport-level failures of the worker loop. A processing failure is
/// not a transport failure; it finalizes the match as `failed` instead.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Result of one processing attempt, before any store write.
#[derive(Debug)]
pub enum JobOutcome {
    Success(Vec<HighlightDraft>),
    Failure(ProcessingError),
}

/// Consumer side of the job pipeline: pulls job descriptors, runs the
/// processor, persists results, finalizes match status.
pub struct Worker<P> {
    db: PgPool,
    queue: Arc<JobQueue>,
    processor: P,
    poll_interval: Duration,
}

impl<P: Processor> Worker<P> {
    pub fn new(db: PgPool, queue: Arc<JobQueue>, processor: P, poll_interval: Duration) -> Self {
        Self {
            db,
            queue,
            processor,
            poll_interval,
        }
    }

    /// Run the job loop until the process is killed.
    pub async fn run(&self) {
        loop {
            match self.process_next_job().await {
                Ok(true) => {
                    tracing::debug!("job handled, checking for next job");
                }
                Ok(false) => {
                    tracing::trace!("no jobs available, sleeping");
                    sleep(self.poll_interval).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "worker loop error");
                    sleep(self.poll_interval).await;
                }
            }
        }
    }

    /// Process the next job from the queue.
    ///
    /// Returns Ok(true) if a job was handled, Ok(false) if the queue was
    /// empty. Only queue/store transport errors surface as Err.
    pub async fn process_next_job(&self) -> Result<bool, WorkerError> {
        let job = match self.queue.dequeue().await? {
            Some(j) => j,
            None => return Ok(false),
        };

        tracing::info!(
            job_id = %job.job_id,
            kind = %job.kind,
            match_id = job.match_id,
            "picked up job"
        );

        self.handle_job(&job).await?;

        // A caught processing error is terminal for this attempt: the
        // descriptor is acknowledged, never re-queued as a retry signal.
        self.queue.complete(&job).await?;
        Ok(true)
    }

    async fn handle_job(&self, job: &JobDescriptor) -> Result<(), WorkerError> {
        let Some(match_record) = queries::get_match(&self.db, job.match_id).await? else {
            // No status to mutate; discard the job.
            tracing::warn!(
                job_id = %job.job_id,
                match_id = job.match_id,
                "match not found, discarding job"
            );
            return Ok(());
        };

        let started = Instant::now();
        let outcome = self.run_processor(&match_record).await;
        metrics::histogram!("match_processing_seconds").record(started.elapsed().as_secs_f64());

        self.finalize(job.match_id, outcome).await;
        Ok(())
    }

    /// First phase: run the processor and validate its drafts. No store
    /// writes happen here.
    async fn run_processor(&self, match_record: &Match) -> JobOutcome {
        let drafts = match self.processor.process(match_record).await {
            Ok(drafts) => drafts,
            Err(e) => return JobOutcome::Failure(e),
        };

        for draft in &drafts {
            if let Err(e) = draft.check() {
                return JobOutcome::Failure(ProcessingError::from(e));
            }
        }

        JobOutcome::Success(drafts)
    }

    /// Second phase: persist the outcome. Store failures here never bubble
    /// up; the fallback is a best-effort flip to `failed`, and if that also
    /// fails the match stays `processing` until an operator intervenes.
    async fn finalize(&self, match_id: i64, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Success(drafts) => {
                match queries::complete_with_highlights(&self.db, match_id, &drafts).await {
                    Ok(count) => {
                        metrics::counter!("match_jobs_completed_total").increment(1);
                        tracing::info!(match_id, highlights = count, "match processed");
                    }
                    Err(e) => {
                        tracing::error!(match_id, error = %e, "failed to persist highlights");
                        self.mark_failed(match_id).await;
                    }
                }
            }
            JobOutcome::Failure(e) => {
                tracing::warn!(match_id, error = %e, "processing failed");
                self.mark_failed(match_id).await;
            }
        }
    }

    async fn mark_failed(&self, match_id: i64) {
        metrics::counter!("match_jobs_failed_total").increment(1);
        match queries::set_status(&self.db, match_id, MatchStatus::Failed).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(match_id, "match disappeared before failure could be recorded");
            }
            Err(e) => {
                // Unresolved failure mode: the match stays in `processing`
                // with no job in flight.
                metrics::counter!("match_finalize_failures_total").increment(1);
                tracing::error!(
                    match_id,
                    error = %e,
                    "could not record failure, match left in processing"
                );
            }
        }
    }
}
