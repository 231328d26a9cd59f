//! Migration coordinator: one serialized attempt to move one file.
//!
//! A migration switches an upload's content to the other backend, persists
//! the new `(store, path)` pair atomically, and only then deletes the
//! original copy. Concurrent attempts for the same owner are serialized by
//! an advisory lease; a second caller fails fast instead of queuing. On any
//! failure before the metadata write is confirmed, the partially stored
//! copy is removed and the record is left exactly where it was.
//!
//! Recovery from a crashed holder is lease expiry only. A holder that dies
//! between storing the new copy and releasing leaves both copies in place
//! until the lease times out and a fresh attempt re-runs from scratch; the
//! rollback in this module runs only within the original call.

use std::sync::Arc;
use std::time::Duration;

use stowage_core::models::{MigrationJob, OwnerRef, UploadRecord};
use stowage_core::{
    AppError, DistributedLock, MigrationHooks, NoOpMigrationHooks, StoreKind, UploadPersistence,
};
use stowage_storage::{keys, StorageFactory};

use crate::error::MigrateError;

/// Lease key serializing migrations for one owner. Both mount points of an
/// owner contend on the same key, matching the uploader-family scope the
/// key prefix encodes.
pub fn lease_key(owner: &OwnerRef) -> String {
    format!("upload:migrate:{}:{}", owner.type_name, owner.id)
}

pub struct MigrationCoordinator {
    factory: Arc<dyn StorageFactory>,
    uploads: Arc<dyn UploadPersistence>,
    lock: Arc<dyn DistributedLock>,
    hooks: Arc<dyn MigrationHooks>,
    base_dir: String,
    lease_timeout: Duration,
}

impl MigrationCoordinator {
    pub fn new(
        factory: Arc<dyn StorageFactory>,
        uploads: Arc<dyn UploadPersistence>,
        lock: Arc<dyn DistributedLock>,
        base_dir: impl Into<String>,
        lease_timeout: Duration,
    ) -> Self {
        Self {
            factory,
            uploads,
            lock,
            hooks: Arc::new(NoOpMigrationHooks),
            base_dir: base_dir.into(),
            lease_timeout,
        }
    }

    /// Replace the default no-op hooks.
    pub fn with_hooks(mut self, hooks: Arc<dyn MigrationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Move `record`'s content to `target` and return the updated record.
    ///
    /// A call with `target` equal to the record's current store, or with a
    /// record that references no file, returns the record unchanged without
    /// touching the lease or any backend. A repeated call after success is
    /// therefore a clean no-op, and a call after failure retries from
    /// scratch.
    #[tracing::instrument(skip(self, record), fields(upload_id = record.id, from = %record.store, to = %target))]
    pub async fn migrate(
        &self,
        record: &UploadRecord,
        target: StoreKind,
    ) -> Result<UploadRecord, MigrateError> {
        if record.store == target || !record.has_file() {
            return Ok(record.clone());
        }

        let key = lease_key(&record.owner());
        let token = match self.lock.try_acquire(&key, self.lease_timeout).await? {
            Some(token) => token,
            None => return Err(MigrateError::AlreadyRunning { key }),
        };

        let result = self.migrate_locked(record, target).await;

        // The lease is released no matter how the attempt ended; a failed
        // release is logged and the lease ages out on its own.
        if let Err(e) = self.lock.release(&key, token).await {
            tracing::warn!(error = %e, lease_key = %key, "Failed to release migration lease");
        }

        result
    }

    /// Execute one background migration request: load the upload it names
    /// and offload it to the remote store.
    #[tracing::instrument(skip(self, job), fields(upload_id = job.upload_record_id))]
    pub async fn run_job(&self, job: &MigrationJob) -> Result<UploadRecord, MigrateError> {
        let record = self
            .uploads
            .get_by_id(job.upload_record_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("upload {} does not exist", job.upload_record_id))
            })?;

        self.migrate(&record, StoreKind::Remote).await
    }

    async fn migrate_locked(
        &self,
        record: &UploadRecord,
        target: StoreKind,
    ) -> Result<UploadRecord, MigrateError> {
        // Resolve both ends before any I/O so an unavailable target fails
        // the attempt before anything is written.
        let source = self.factory.backend_for(record.store)?;
        let target_backend = self.factory.backend_for(target)?;

        // Rollback point: the record's current pair. The persisted row only
        // changes in the single atomic update below, so on failure the row
        // still holds this pair.
        let previous_path = record.path.clone();

        let new_path = keys::location(
            target,
            &self.base_dir,
            &record.owner(),
            &record.mount_point,
            record.filename(),
        );

        // Buffer the content up front; the copy stays readable even if the
        // original is removed while later steps run.
        let outcome: Result<UploadRecord, MigrateError> = async {
            let content = source.retrieve(&previous_path).await?;

            self.hooks.before_migrate(record, target).await?;
            self.hooks.before_store(record, target).await?;

            let locator = target_backend.store(&new_path, content).await?;

            let updated = self
                .uploads
                .persist_location(record.id, target, &locator)
                .await
                .map_err(MigrateError::Persist)?;

            Ok(updated)
        }
        .await;

        match outcome {
            Ok(updated) => {
                // The new location is durable; dropping the original now
                // cannot strand a reader. A failed source delete leaves an
                // orphan copy, not an inconsistent record.
                if let Err(e) = source.delete(&previous_path).await {
                    tracing::warn!(
                        error = %e,
                        path = %previous_path,
                        "Failed to delete source copy after migration"
                    );
                }

                tracing::info!(
                    upload_id = updated.id,
                    from = %record.store,
                    to = %updated.store,
                    path = %updated.path,
                    "Upload migrated"
                );

                Ok(updated)
            }
            Err(e) => {
                // The target copy may exist even though the metadata write
                // never applied; remove it so a failed attempt leaves no
                // orphan behind.
                if let Err(cleanup) = target_backend.delete(&new_path).await {
                    tracing::warn!(
                        error = %cleanup,
                        path = %new_path,
                        "Failed to delete partially migrated copy"
                    );
                }

                tracing::error!(
                    error = %e,
                    upload_id = record.id,
                    from = %record.store,
                    to = %target,
                    "Migration failed, upload left in place"
                );

                Err(e)
            }
        }
    }
}
