use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::highlight::Highlight;
use crate::models::matches::{Match, MatchStatus};

/// Request to register an uploaded match video.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatchRequest {
    #[garde(length(min = 1, max = 200))]
    pub title: String,

    /// Stored URL/path of the uploaded video.
    #[garde(length(min = 1, max = 500))]
    pub video_url: String,
}

/// A match as returned by list/detail endpoints.
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub id: i64,
    pub title: String,
    pub video_url: String,
    pub status: MatchStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Match> for MatchResponse {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            title: m.title,
            video_url: m.video_url,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

/// A match together with its highlights.
#[derive(Debug, Serialize)]
pub struct MatchDetailResponse {
    #[serde(flatten)]
    pub match_info: MatchResponse,
    pub highlights: Vec<HighlightResponse>,
}

/// A highlight as returned by the API.
#[derive(Debug, Serialize)]
pub struct HighlightResponse {
    pub id: i64,
    pub start_time: f64,
    pub end_time: f64,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_url: Option<String>,
}

impl From<Highlight> for HighlightResponse {
    fn from(h: Highlight) -> Self {
        Self {
            id: h.id,
            start_time: h.start_time,
            end_time: h.end_time,
            event_type: h.event_type,
            confidence: h.confidence,
            clip_url: h.clip_url,
        }
    }
}

/// Response after requesting processing for a match.
///
/// "already_processing" is a success-shaped outcome, not an error: the
/// request was understood, a job is simply already in flight.
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub match_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
    pub status: String,
    pub message: String,
}
