mod app_state;
mod config;
mod db;
mod models;
mod routes;
mod services;

use axum::{routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use app_state::AppState;
use config::AppConfig;
use services::queue::JobQueue;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing football-highlights server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "match_jobs_dispatched_total",
        "Total processing jobs dispatched"
    );
    metrics::describe_counter!(
        "match_jobs_completed_total",
        "Total processing jobs completed successfully"
    );
    metrics::describe_counter!("match_jobs_failed_total", "Total processing jobs that failed");
    metrics::describe_counter!(
        "match_dispatch_partial_failures_total",
        "Dispatches where the status write committed but the enqueue failed"
    );
    metrics::describe_counter!(
        "match_finalize_failures_total",
        "Failed attempts to record a failure status (match left in processing)"
    );
    metrics::describe_histogram!(
        "match_processing_seconds",
        "Time spent in the processing function per job"
    );
    metrics::describe_gauge!(
        "match_queue_depth",
        "Current number of pending jobs in the queue"
    );

    // Initialize database connection pool
    tracing::info!("Connecting to PostgreSQL database");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run database migrations
    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Initialize Redis job queue
    tracing::info!("Connecting to Redis job queue");
    let queue = JobQueue::new(&config.redis_url).expect("Failed to initialize job queue");

    // Create shared application state
    let state = AppState::new(db_pool, queue);

    // Build API routes
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/api/v1/matches",
            post(routes::matches::create_match).get(routes::matches::list_matches),
        )
        .route("/api/v1/matches/{match_id}", get(routes::matches::get_match))
        .route(
            "/api/v1/matches/{match_id}/highlights",
            get(routes::matches::get_highlights),
        )
        .route(
            "/api/v1/matches/{match_id}/process",
            post(routes::process::process_match),
        )
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(1024 * 1024)); // 1 MB limit

    tracing::info!("Starting football-highlights on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
