#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-remote")]
use crate::RemoteStorage;
use crate::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use stowage_core::{Config, StoreKind};

/// Hands out the backend matching a store kind.
///
/// The coordinator resolves both ends of a migration through this seam, so
/// tests can substitute in-memory or tempdir-backed backends.
pub trait StorageFactory: Send + Sync {
    fn backend_for(&self, kind: StoreKind) -> StorageResult<Arc<dyn Storage>>;
}

/// Factory over the configured backends, built once at startup.
///
/// The remote backend is only constructed when object store support is
/// enabled; requesting it otherwise fails with `ObjectStoreUnavailable`
/// until configuration changes.
pub struct ConfigStorageFactory {
    #[cfg(feature = "storage-local")]
    local: Arc<dyn Storage>,
    #[cfg(feature = "storage-remote")]
    remote: Option<Arc<dyn Storage>>,
}

impl ConfigStorageFactory {
    pub async fn from_config(config: &Config) -> StorageResult<Self> {
        #[cfg(feature = "storage-local")]
        let local: Arc<dyn Storage> = {
            let storage = LocalStorage::new(config.local_store.storage_path.clone()).await?;
            Arc::new(storage)
        };

        #[cfg(feature = "storage-remote")]
        let remote: Option<Arc<dyn Storage>> = if config.object_store.enabled {
            let storage = RemoteStorage::new(&config.object_store).await?;
            Some(Arc::new(storage))
        } else {
            None
        };

        Ok(Self {
            #[cfg(feature = "storage-local")]
            local,
            #[cfg(feature = "storage-remote")]
            remote,
        })
    }
}

impl StorageFactory for ConfigStorageFactory {
    fn backend_for(&self, kind: StoreKind) -> StorageResult<Arc<dyn Storage>> {
        match kind {
            #[cfg(feature = "storage-local")]
            StoreKind::Local => Ok(self.local.clone()),

            #[cfg(not(feature = "storage-local"))]
            StoreKind::Local => Err(StorageError::ConfigError(
                "Local storage backend not available (storage-local feature not enabled)"
                    .to_string(),
            )),

            #[cfg(feature = "storage-remote")]
            StoreKind::Remote => self
                .remote
                .clone()
                .ok_or(StorageError::ObjectStoreUnavailable),

            #[cfg(not(feature = "storage-remote"))]
            StoreKind::Remote => Err(StorageError::ObjectStoreUnavailable),
        }
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use stowage_core::config::{LocalStoreConfig, ObjectStoreConfig};

    fn config_with_local_root(root: &std::path::Path) -> Config {
        Config {
            database_url: String::new(),
            object_store: ObjectStoreConfig::default(),
            local_store: LocalStoreConfig {
                storage_path: root.to_string_lossy().into_owned(),
                base_dir: "uploads".to_string(),
            },
            lease_timeout_secs: 3600,
        }
    }

    #[tokio::test]
    async fn local_backend_always_available() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ConfigStorageFactory::from_config(&config_with_local_root(dir.path()))
            .await
            .unwrap();

        let backend = factory.backend_for(StoreKind::Local).unwrap();
        assert_eq!(backend.kind(), StoreKind::Local);
    }

    #[tokio::test]
    async fn remote_backend_unavailable_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ConfigStorageFactory::from_config(&config_with_local_root(dir.path()))
            .await
            .unwrap();

        let result = factory.backend_for(StoreKind::Remote);
        assert!(matches!(result, Err(StorageError::ObjectStoreUnavailable)));
    }
}
