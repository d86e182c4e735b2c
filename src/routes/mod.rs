use axum::http::StatusCode;

pub mod health;
pub mod matches;
pub mod metrics;
pub mod process;

/// Log an internal error and collapse it to a 500.
pub(crate) fn internal_error<E: std::fmt::Display>(e: E) -> StatusCode {
    tracing::error!(error = %e, "internal error");
    StatusCode::INTERNAL_SERVER_ERROR
}
