use sqlx::PgPool;
use std::sync::Arc;

use crate::services::dispatcher::Dispatcher;
use crate::services::queue::JobQueue;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub queue: Arc<JobQueue>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(db: PgPool, queue: JobQueue) -> Self {
        let queue = Arc::new(queue);
        let dispatcher = Arc::new(Dispatcher::new(db.clone(), Arc::clone(&queue)));
        Self {
            db,
            queue,
            dispatcher,
        }
    }
}
