use football_highlights::{
    config::AppConfig,
    db,
    services::{processor::StubProcessor, queue::JobQueue, worker::Worker},
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting match processing worker");

    // Load configuration
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize database
    tracing::info!("Connecting to PostgreSQL");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Initialize job queue
    tracing::info!("Connecting to Redis job queue");
    let queue = Arc::new(JobQueue::new(&config.redis_url).expect("Failed to initialize job queue"));

    // The stub processor stands in for the real decode/classify/render
    // pipeline; swap it here when one exists.
    let processor = StubProcessor::new(Duration::from_secs(config.processing_delay_secs));

    let worker = Worker::new(
        db_pool,
        queue,
        processor,
        Duration::from_millis(config.worker_poll_interval_ms),
    );

    tracing::info!("Worker ready, starting job processing loop");
    worker.run().await;
}
