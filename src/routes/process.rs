use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::app_state::AppState;
use crate::models::api::ProcessResponse;
use crate::services::dispatcher::DispatchOutcome;

/// POST /api/v1/matches/{match_id}/process — dispatch a processing job.
///
/// "already_processing" comes back success-shaped: the request was
/// understood, a job is simply already in flight for this match.
pub async fn process_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<(StatusCode, Json<ProcessResponse>), StatusCode> {
    match state.dispatcher.submit(match_id).await {
        Ok(DispatchOutcome::Dispatched { job_id, match_id }) => Ok((
            StatusCode::ACCEPTED,
            Json(ProcessResponse {
                match_id,
                job_id: Some(job_id),
                status: "dispatched".to_string(),
                message: "Match queued for processing".to_string(),
            }),
        )),
        Ok(DispatchOutcome::AlreadyProcessing { match_id }) => Ok((
            StatusCode::OK,
            Json(ProcessResponse {
                match_id,
                job_id: None,
                status: "already_processing".to_string(),
                message: "Match is already processing".to_string(),
            }),
        )),
        Ok(DispatchOutcome::NotFound) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            // Includes the partial-dispatch case: status flipped but no job
            // enqueued. Surfaced so the caller can retry or escalate.
            tracing::error!(match_id, error = %e, "dispatch failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
