use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::db::queries;
use crate::models::api::{
    CreateMatchRequest, HighlightResponse, MatchDetailResponse, MatchResponse,
};
use crate::routes::internal_error;

/// POST /api/v1/matches — register an uploaded match video.
pub async fn create_match(
    State(state): State<AppState>,
    Json(payload): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>), StatusCode> {
    payload
        .validate()
        .map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;

    let match_record = queries::create_match(&state.db, &payload.title, &payload.video_url)
        .await
        .map_err(internal_error)?;

    tracing::info!(match_id = match_record.id, title = %match_record.title, "match created");

    Ok((StatusCode::CREATED, Json(match_record.into())))
}

/// GET /api/v1/matches — list matches, newest first.
pub async fn list_matches(
    State(state): State<AppState>,
) -> Result<Json<Vec<MatchResponse>>, StatusCode> {
    let matches = queries::list_matches(&state.db)
        .await
        .map_err(internal_error)?;

    Ok(Json(matches.into_iter().map(MatchResponse::from).collect()))
}

/// GET /api/v1/matches/{match_id} — fetch a match with its highlights.
pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<MatchDetailResponse>, StatusCode> {
    let match_record = queries::get_match(&state.db, match_id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let highlights = queries::list_highlights(&state.db, match_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(MatchDetailResponse {
        match_info: match_record.into(),
        highlights: highlights.into_iter().map(HighlightResponse::from).collect(),
    }))
}

/// GET /api/v1/matches/{match_id}/highlights — highlights ordered by start time.
pub async fn get_highlights(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<Vec<HighlightResponse>>, StatusCode> {
    let highlights = queries::list_highlights(&state.db, match_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(
        highlights.into_iter().map(HighlightResponse::from).collect(),
    ))
}
