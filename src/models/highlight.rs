use garde::Validate;
use serde::{Deserialize, Serialize};

/// A detected event interval within a match video.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Highlight {
    pub id: i64,
    pub match_id: i64,

    /// Seconds from kick-off in the source video.
    pub start_time: f64,
    pub end_time: f64,

    /// e.g. "goal", "shot_on_target", "save", "foul", "yellow_card"
    pub event_type: String,

    pub confidence: Option<f64>,
    pub clip_url: Option<String>,
}

/// A highlight produced by a processor, not yet persisted.
///
/// Workers validate drafts before inserting them; a processor that emits an
/// invalid interval fails the whole attempt.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HighlightDraft {
    #[garde(range(min = 0.0))]
    pub start_time: f64,

    #[garde(range(min = 0.0))]
    pub end_time: f64,

    #[garde(length(min = 1, max = 100))]
    pub event_type: String,

    #[garde(inner(range(min = 0.0, max = 1.0)))]
    pub confidence: Option<f64>,

    #[garde(skip)]
    pub clip_url: Option<String>,
}

/// Why a draft was rejected before persistence.
#[derive(Debug, thiserror::Error)]
pub enum InvalidDraft {
    #[error("{0}")]
    Fields(garde::Report),

    #[error("end_time {end} is not after start_time {start}")]
    Interval { start: f64, end: f64 },
}

impl HighlightDraft {
    /// Validate field constraints plus interval ordering.
    ///
    /// The cross-field ordering check lives here rather than in the garde
    /// derive, which validates fields in isolation.
    pub fn check(&self) -> Result<(), InvalidDraft> {
        self.validate().map_err(InvalidDraft::Fields)?;
        if self.end_time <= self.start_time {
            return Err(InvalidDraft::Interval {
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_draft() -> HighlightDraft {
        HighlightDraft {
            start_time: 120.0,
            end_time: 135.0,
            event_type: "goal".to_string(),
            confidence: Some(0.98),
            clip_url: Some("s3://bucket/path/to/example_goal_clip.mp4".to_string()),
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(goal_draft().check().is_ok());
    }

    #[test]
    fn test_inverted_interval_rejected() {
        let mut draft = goal_draft();
        draft.end_time = draft.start_time;
        assert!(matches!(draft.check(), Err(InvalidDraft::Interval { .. })));

        draft.end_time = 90.0;
        assert!(draft.check().is_err());
    }

    #[test]
    fn test_negative_start_rejected() {
        let mut draft = goal_draft();
        draft.start_time = -1.0;
        assert!(matches!(draft.check(), Err(InvalidDraft::Fields(_))));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let mut draft = goal_draft();
        draft.confidence = Some(1.2);
        assert!(draft.check().is_err());
    }

    #[test]
    fn test_missing_confidence_allowed() {
        let mut draft = goal_draft();
        draft.confidence = None;
        draft.clip_url = None;
        assert!(draft.check().is_ok());
    }
}
