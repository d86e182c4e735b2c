use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a match in the async processing pipeline.
///
/// `processing` doubles as the mutex flag for the at-most-one-in-flight-job
/// invariant: the dispatcher refuses to enqueue while a match holds it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    Uploaded,
    Processing,
    Done,
    Failed,
}

impl MatchStatus {
    /// Whether a processing request may be accepted in this status.
    ///
    /// Every status except `processing` accepts a dispatch: `done` and
    /// `failed` matches can be re-processed.
    pub fn accepts_dispatch(self) -> bool {
        !matches!(self, MatchStatus::Processing)
    }

    /// Whether this status marks the end of a processing attempt.
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Done | MatchStatus::Failed)
    }

    /// Legal transitions of the status state machine.
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        match (self, next) {
            // Dispatcher claims the match.
            (MatchStatus::Uploaded, MatchStatus::Processing) => true,
            // Re-processing after a terminal status.
            (MatchStatus::Done, MatchStatus::Processing) => true,
            (MatchStatus::Failed, MatchStatus::Processing) => true,
            // Worker finalizes the attempt.
            (MatchStatus::Processing, MatchStatus::Done) => true,
            (MatchStatus::Processing, MatchStatus::Failed) => true,
            _ => false,
        }
    }
}

/// An uploaded match video tracked through the processing lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub title: String,
    pub video_url: String,
    pub status: MatchStatus,

    /// When the dispatcher last claimed this match for processing.
    /// Persisted so matches stuck in `processing` (crashed worker, failed
    /// enqueue) remain findable by an operator or reconciliation sweep.
    pub dispatched_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_dispatch_accepted_from_all_but_processing() {
        assert!(MatchStatus::Uploaded.accepts_dispatch());
        assert!(MatchStatus::Done.accepts_dispatch());
        assert!(MatchStatus::Failed.accepts_dispatch());
        assert!(!MatchStatus::Processing.accepts_dispatch());
    }

    #[test]
    fn test_worker_transitions() {
        assert!(MatchStatus::Processing.can_transition_to(MatchStatus::Done));
        assert!(MatchStatus::Processing.can_transition_to(MatchStatus::Failed));
        assert!(!MatchStatus::Uploaded.can_transition_to(MatchStatus::Done));
        assert!(!MatchStatus::Uploaded.can_transition_to(MatchStatus::Failed));
    }

    #[test]
    fn test_terminal_statuses_never_finalize_again() {
        assert!(!MatchStatus::Done.can_transition_to(MatchStatus::Failed));
        assert!(!MatchStatus::Failed.can_transition_to(MatchStatus::Done));
        // But both re-enter processing on re-dispatch.
        assert!(MatchStatus::Done.can_transition_to(MatchStatus::Processing));
        assert!(MatchStatus::Failed.can_transition_to(MatchStatus::Processing));
    }

    #[test]
    fn test_status_string_form() {
        assert_eq!(MatchStatus::Uploaded.to_string(), "uploaded");
        assert_eq!(MatchStatus::Processing.to_string(), "processing");
        assert_eq!(MatchStatus::from_str("done").unwrap(), MatchStatus::Done);
        assert!(MatchStatus::from_str("archived").is_err());
    }
}
