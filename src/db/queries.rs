use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;

use crate::models::highlight::{Highlight, HighlightDraft};
use crate::models::matches::{Match, MatchStatus};

fn match_from_row(row: &PgRow) -> Result<Match, sqlx::Error> {
    let status_str: String = row.try_get("status")?;
    let status = MatchStatus::from_str(&status_str).map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })?;

    Ok(Match {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        video_url: row.try_get("video_url")?,
        status,
        dispatched_at: row.try_get("dispatched_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Insert a new match in status `uploaded`
pub async fn create_match(
    pool: &PgPool,
    title: &str,
    video_url: &str,
) -> Result<Match, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO matches (title, video_url)
        VALUES ($1, $2)
        RETURNING id, title, video_url, status, dispatched_at, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(video_url)
    .fetch_one(pool)
    .await?;

    match_from_row(&row)
}

/// Get a match by ID
pub async fn get_match(pool: &PgPool, match_id: i64) -> Result<Option<Match>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, title, video_url, status, dispatched_at, created_at, updated_at
        FROM matches
        WHERE id = $1
        "#,
    )
    .bind(match_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(match_from_row).transpose()
}

/// List all matches, newest first
pub async fn list_matches(pool: &PgPool) -> Result<Vec<Match>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, video_url, status, dispatched_at, created_at, updated_at
        FROM matches
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(match_from_row).collect()
}

/// Conditionally claim a match for processing.
///
/// The claim is a single conditional update, so two near-simultaneous
/// dispatch requests cannot both win: the second sees zero rows affected.
/// Returns `false` when the match is missing or already `processing`;
/// callers distinguish the two with a follow-up read.
pub async fn begin_processing(pool: &PgPool, match_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE matches
        SET status = 'processing', dispatched_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND status <> 'processing'
        "#,
    )
    .bind(match_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Set a match status unconditionally.
///
/// Returns `false` if the match no longer exists.
pub async fn set_status(
    pool: &PgPool,
    match_id: i64,
    status: MatchStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE matches
        SET status = $1, updated_at = NOW()
        WHERE id = $2
        "#,
    )
    .bind(status.to_string())
    .bind(match_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Persist a finished processing attempt: insert all highlight rows, then
/// flip the match to `done`, inside one transaction. A reader that observes
/// `done` always observes the rows.
///
/// Returns the number of highlights inserted.
pub async fn complete_with_highlights(
    pool: &PgPool,
    match_id: i64,
    drafts: &[HighlightDraft],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut inserted = 0u64;
    for draft in drafts {
        sqlx::query(
            r#"
            INSERT INTO highlights (match_id, start_time, end_time, event_type, confidence, clip_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(match_id)
        .bind(draft.start_time)
        .bind(draft.end_time)
        .bind(&draft.event_type)
        .bind(draft.confidence)
        .bind(draft.clip_url.as_deref())
        .execute(&mut *tx)
        .await?;
        inserted += 1;
    }

    sqlx::query(
        r#"
        UPDATE matches
        SET status = 'done', updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(match_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(inserted)
}

/// List highlights for a match, ordered by start time
pub async fn list_highlights(pool: &PgPool, match_id: i64) -> Result<Vec<Highlight>, sqlx::Error> {
    sqlx::query_as::<_, Highlight>(
        r#"
        SELECT id, match_id, start_time, end_time, event_type, confidence, clip_url
        FROM highlights
        WHERE match_id = $1
        ORDER BY start_time ASC
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await
}
