//! Migration job hand-off table.
//!
//! The scheduler inserts one row per migration request; an external runner
//! drains them. Enqueue NOTIFYs the runner channel so a listening runner
//! wakes immediately instead of polling. Claiming removes the row; retry
//! and backoff policy belong to the runner, which re-enqueues if it wants
//! another attempt.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use stowage_core::models::{MigrationJob, JOB_NOTIFY_CHANNEL};
use stowage_core::{AppError, JobQueue};

/// Row type for the migration_jobs table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct MigrationJobRow {
    resource_type: String,
    uploader_type: String,
    mount_point: String,
    upload_id: i64,
}

impl MigrationJobRow {
    fn into_job(self) -> MigrationJob {
        MigrationJob {
            resource_type_name: self.resource_type,
            uploader_type_name: self.uploader_type,
            mount_point: self.mount_point,
            upload_record_id: self.upload_id,
        }
    }
}

/// Repository for the migration_jobs table.
#[derive(Clone)]
pub struct MigrationJobRepository {
    pool: PgPool,
}

impl MigrationJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pop the oldest pending job, if any. Concurrent runners skip each
    /// other's claims instead of blocking.
    #[tracing::instrument(skip(self), fields(db.table = "migration_jobs"))]
    pub async fn claim_next(&self) -> Result<Option<MigrationJob>, AppError> {
        let row: Option<MigrationJobRow> = sqlx::query_as::<Postgres, MigrationJobRow>(
            r#"
            DELETE FROM migration_jobs
            WHERE id = (
                SELECT id FROM migration_jobs
                ORDER BY id
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            RETURNING resource_type, uploader_type, mount_point, upload_id
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_job()))
    }
}

#[async_trait]
impl JobQueue for MigrationJobRepository {
    #[tracing::instrument(skip(self, job), fields(db.table = "migration_jobs", upload_id = job.upload_record_id))]
    async fn enqueue(&self, job: MigrationJob) -> Result<(), AppError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO migration_jobs (resource_type, uploader_type, mount_point, upload_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&job.resource_type_name)
        .bind(&job.uploader_type_name)
        .bind(&job.mount_point)
        .bind(job.upload_record_id)
        .fetch_one(&self.pool)
        .await?;

        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(JOB_NOTIFY_CHANNEL)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        tracing::info!(
            job_id = id,
            upload_id = job.upload_record_id,
            mount_point = %job.mount_point,
            "Migration job enqueued"
        );

        Ok(())
    }
}
