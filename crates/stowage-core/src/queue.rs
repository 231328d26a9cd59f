//! Hand-off boundary to the external job runner.
//!
//! The scheduler persists one request per eligible mount point; executing
//! the requests (worker pool, retry, backoff) belongs to the runner, not to
//! this subsystem.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::MigrationJob;

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Durably record one migration request. Callers must only enqueue after
    /// the commit that made the upload eligible is itself durable.
    async fn enqueue(&self, job: MigrationJob) -> Result<(), AppError>;
}
