use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::models::highlight::{HighlightDraft, InvalidDraft};
use crate::models::matches::Match;

/// Errors an event-detection pipeline can surface.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("video source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("event detection failed: {0}")]
    Detection(String),

    #[error("invalid highlight draft: {0}")]
    InvalidDraft(#[from] InvalidDraft),
}

/// Capability that turns a match video into highlight drafts.
///
/// Implementations may take unbounded wall-clock time and must not touch
/// the store; the worker owns all persistence. Swapping the implementation
/// (decode, classify, render) does not touch the worker loop.
pub trait Processor: Send + Sync {
    fn process(
        &self,
        m: &Match,
    ) -> impl Future<Output = Result<Vec<HighlightDraft>, ProcessingError>> + Send;
}

/// Stand-in for the real decode/classify/render pipeline: waits a fixed
/// delay, then emits a single fabricated goal highlight.
#[derive(Debug, Clone)]
pub struct StubProcessor {
    delay: Duration,
}

impl StubProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for StubProcessor {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Processor for StubProcessor {
    async fn process(&self, m: &Match) -> Result<Vec<HighlightDraft>, ProcessingError> {
        tracing::info!(match_id = m.id, title = %m.title, "processing match video");

        // Simulate heavy processing.
        sleep(self.delay).await;

        Ok(vec![HighlightDraft {
            start_time: 120.0,
            end_time: 135.0,
            event_type: "goal".to_string(),
            confidence: Some(0.98),
            clip_url: Some("s3://bucket/path/to/example_goal_clip.mp4".to_string()),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::matches::MatchStatus;
    use chrono::Utc;

    fn sample_match() -> Match {
        Match {
            id: 1,
            title: "Derby".to_string(),
            video_url: "http://x/vid.mp4".to_string(),
            status: MatchStatus::Processing,
            dispatched_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_stub_emits_one_goal() {
        let processor = StubProcessor::new(Duration::from_millis(1));
        let drafts = processor.process(&sample_match()).await.unwrap();

        assert_eq!(drafts.len(), 1);
        let goal = &drafts[0];
        assert_eq!(goal.event_type, "goal");
        assert_eq!(goal.start_time, 120.0);
        assert_eq!(goal.end_time, 135.0);
        assert_eq!(goal.confidence, Some(0.98));
        assert!(goal.check().is_ok());
    }
}
