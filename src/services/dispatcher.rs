use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::queries;
use crate::services::queue::{JobKind, JobQueue, QueueError};

/// Outcome of a processing request.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The match was claimed and exactly one job was enqueued.
    Dispatched { job_id: Uuid, match_id: i64 },

    /// A job is already in flight for this match; nothing was mutated and
    /// nothing was enqueued. A normal outcome, not an error.
    AlreadyProcessing { match_id: i64 },

    /// No match with the given id exists.
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The match was claimed but the enqueue failed: it is left in
    /// `processing` with no job in flight. `dispatched_at` marks it for a
    /// reconciliation sweep or operator reset.
    #[error("match {match_id} claimed for processing but enqueue failed: {source}")]
    Enqueue {
        match_id: i64,
        #[source]
        source: QueueError,
    },
}

/// Producer side of the job pipeline: validates a processing request
/// against current status, claims the match, and enqueues one job.
pub struct Dispatcher {
    db: PgPool,
    queue: Arc<JobQueue>,
}

impl Dispatcher {
    pub fn new(db: PgPool, queue: Arc<JobQueue>) -> Self {
        Self { db, queue }
    }

    /// Submit a processing request for a match.
    ///
    /// The claim is a conditional update (`status <> 'processing'`), so
    /// concurrent submissions for the same match cannot both enqueue. The
    /// status write commits before the enqueue: a worker picking the job up
    /// immediately afterward always observes `processing`.
    pub async fn submit(&self, match_id: i64) -> Result<DispatchOutcome, DispatchError> {
        if !queries::begin_processing(&self.db, match_id).await? {
            // Zero rows affected: already processing, or no such match.
            return Ok(match queries::get_match(&self.db, match_id).await? {
                Some(_) => DispatchOutcome::AlreadyProcessing { match_id },
                None => DispatchOutcome::NotFound,
            });
        }

        match self.queue.enqueue(JobKind::Process, match_id).await {
            Ok(job_id) => {
                metrics::counter!("match_jobs_dispatched_total").increment(1);
                tracing::info!(match_id, job_id = %job_id, "processing job dispatched");
                Ok(DispatchOutcome::Dispatched { job_id, match_id })
            }
            Err(source) => {
                metrics::counter!("match_dispatch_partial_failures_total").increment(1);
                Err(DispatchError::Enqueue { match_id, source })
            }
        }
    }
}
