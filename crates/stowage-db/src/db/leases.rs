//! Postgres-backed migration leases.
//!
//! One row per lease key. Acquisition is a single upsert that only succeeds
//! when the key is free or its current lease has expired, so two concurrent
//! attempts on one key can never both win. Tokens are uuids; release only
//! removes the row while the caller's token still owns it, which keeps a
//! crashed holder's late release from evicting a newer owner.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use stowage_core::{AppError, DistributedLock};
use uuid::Uuid;

/// Repository for the upload_leases table.
#[derive(Clone)]
pub struct PgLeaseStore {
    pool: PgPool,
}

impl PgLeaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove leases that expired before now. Expired rows are also taken
    /// over in place by `try_acquire`; this exists for housekeeping so the
    /// table does not accumulate keys that are never contended again.
    #[tracing::instrument(skip(self), fields(db.table = "upload_leases"))]
    pub async fn reap_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM upload_leases WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl DistributedLock for PgLeaseStore {
    #[tracing::instrument(skip(self), fields(db.table = "upload_leases", lease.key = %key))]
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<Uuid>, AppError> {
        let token = Uuid::new_v4();

        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO upload_leases (key, token, expires_at)
            VALUES ($1, $2, now() + make_interval(secs => $3))
            ON CONFLICT (key) DO UPDATE
            SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at
            WHERE upload_leases.expires_at <= now()
            RETURNING token
            "#,
        )
        .bind(key)
        .bind(token)
        .bind(ttl.as_secs_f64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(_) => {
                tracing::debug!(lease.key = %key, lease.token = %token, "Lease acquired");
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "upload_leases", lease.key = %key))]
    async fn release(&self, key: &str, token: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM upload_leases WHERE key = $1 AND token = $2")
            .bind(key)
            .bind(token)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            // Expired and taken over, or already released. Either way the
            // current holder (if any) keeps its lease.
            tracing::debug!(lease.key = %key, lease.token = %token, "Lease already gone on release");
        }
        Ok(())
    }
}
