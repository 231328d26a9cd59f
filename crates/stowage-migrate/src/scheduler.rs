//! Post-commit offload scheduling.
//!
//! After an owning resource's change is committed, each mount point that
//! (still) holds a local file and changed in that commit gets exactly one
//! migration request enqueued. The persistence layer invokes
//! [`BackgroundScheduler::after_commit`] explicitly once the commit is
//! durable; nothing here hooks into saves implicitly.

use std::sync::Arc;

use stowage_core::config::ObjectStoreConfig;
use stowage_core::models::{MigrationJob, MountRegistry, OwnerRef, UploadRecord};
use stowage_core::{AppError, JobQueue, StoreKind};

/// State of one mount point as of a commit.
#[derive(Debug, Clone)]
pub struct MountState {
    pub mount_point: String,
    /// Whether this attachment changed as part of the commit.
    pub changed: bool,
    /// The currently attached upload, if any.
    pub upload: Option<UploadRecord>,
}

pub struct BackgroundScheduler {
    queue: Arc<dyn JobQueue>,
    registry: Arc<dyn MountRegistry>,
    config: ObjectStoreConfig,
}

impl BackgroundScheduler {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        registry: Arc<dyn MountRegistry>,
        config: ObjectStoreConfig,
    ) -> Self {
        Self {
            queue,
            registry,
            config,
        }
    }

    /// Enqueue one migration request per eligible mount point and return
    /// how many were enqueued.
    ///
    /// Must be called only after the commit described by `mounts` is
    /// durable; a request for an upload whose owning write could still roll
    /// back would migrate a file the resource never kept.
    #[tracing::instrument(skip(self, mounts), fields(owner_type = %owner.type_name, owner_id = owner.id))]
    pub async fn after_commit(
        &self,
        owner: &OwnerRef,
        mounts: &[MountState],
    ) -> Result<u32, AppError> {
        if !(self.config.enabled && self.config.background_upload) {
            return Ok(0);
        }

        let mut enqueued = 0;
        for mount in mounts {
            if !mount.changed {
                continue;
            }
            let Some(upload) = &mount.upload else {
                continue;
            };
            if !upload.has_file() || upload.store != StoreKind::Local {
                continue;
            }

            let Some(config) = self
                .registry
                .find_mount_config(&owner.type_name, &mount.mount_point)
            else {
                tracing::warn!(
                    owner_type = %owner.type_name,
                    mount_point = %mount.mount_point,
                    "No mount config registered, skipping offload"
                );
                continue;
            };

            self.queue
                .enqueue(MigrationJob {
                    resource_type_name: owner.type_name.clone(),
                    uploader_type_name: config.uploader_type,
                    mount_point: mount.mount_point.clone(),
                    upload_record_id: upload.id,
                })
                .await?;
            enqueued += 1;
        }

        tracing::debug!(enqueued, "Background offload scheduling finished");
        Ok(enqueued)
    }
}
