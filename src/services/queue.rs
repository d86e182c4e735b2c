use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

const QUEUE_KEY: &str = "highlights:jobs";
const PROCESSING_KEY: &str = "highlights:processing";

/// Kind of asynchronous work a job descriptor requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobKind {
    Process,
}

/// Job descriptor serialized onto the Redis list.
///
/// Transient: lives only on the queue and in flight in a worker, never in
/// the store. `job_id` is assigned by the queue at enqueue time and handed
/// back to the caller for tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub job_id: Uuid,
    pub kind: JobKind,
    pub match_id: i64,
}

/// Redis-backed job queue with at-least-once delivery.
///
/// Delivery moves a descriptor from the pending list to a processing list
/// (`RPOPLPUSH`), so a dequeued job is held by exactly one worker until it
/// acknowledges with [`JobQueue::complete`]. A worker that dies mid-job
/// leaves its descriptor on the processing list, visible to operators.
pub struct JobQueue {
    client: redis::Client,
}

impl JobQueue {
    pub fn new(redis_url: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(redis_url).map_err(QueueError::Redis)?;
        Ok(Self { client })
    }

    /// Enqueue a job for a match. Returns the queue-assigned job id.
    pub async fn enqueue(&self, kind: JobKind, match_id: i64) -> Result<Uuid, QueueError> {
        let job = JobDescriptor {
            job_id: Uuid::new_v4(),
            kind,
            match_id,
        };
        let payload = serde_json::to_string(&job).map_err(QueueError::Serialize)?;

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(QueueError::Redis)?;
        let depth: u64 = conn
            .lpush(QUEUE_KEY, &payload)
            .await
            .map_err(QueueError::Redis)?;

        metrics::gauge!("match_queue_depth").set(depth as f64);
        Ok(job.job_id)
    }

    /// Dequeue a job for processing (pop with move to processing list).
    pub async fn dequeue(&self) -> Result<Option<JobDescriptor>, QueueError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(QueueError::Redis)?;
        let result: Option<String> = conn
            .rpoplpush(QUEUE_KEY, PROCESSING_KEY)
            .await
            .map_err(QueueError::Redis)?;

        match result {
            Some(payload) => {
                let job: JobDescriptor =
                    serde_json::from_str(&payload).map_err(QueueError::Serialize)?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    /// Acknowledge a delivered job (remove from the processing list).
    pub async fn complete(&self, job: &JobDescriptor) -> Result<(), QueueError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(QueueError::Redis)?;
        let payload = serde_json::to_string(job).map_err(QueueError::Serialize)?;
        conn.lrem::<_, _, ()>(PROCESSING_KEY, 1, &payload)
            .await
            .map_err(QueueError::Redis)?;
        Ok(())
    }

    /// Check Redis connectivity (for health checks).
    pub async fn health_check(&self) -> Result<(), QueueError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(QueueError::Redis)?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(QueueError::Redis)?;
        Ok(())
    }

    /// Get the current queue depth (pending jobs).
    pub async fn queue_depth(&self) -> Result<u64, QueueError> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(QueueError::Redis)?;
        let depth: u64 = conn.llen(QUEUE_KEY).await.map_err(QueueError::Redis)?;
        Ok(depth)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_wire_form() {
        let job = JobDescriptor {
            job_id: Uuid::nil(),
            kind: JobKind::Process,
            match_id: 42,
        };
        let payload = serde_json::to_string(&job).unwrap();
        assert!(payload.contains("\"kind\":\"process\""));
        assert!(payload.contains("\"match_id\":42"));

        let parsed: JobDescriptor = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed.kind, JobKind::Process);
        assert_eq!(parsed.match_id, 42);
    }
}
