use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store_kind::StoreKind;

/// Identity of the domain entity an upload belongs to.
///
/// Used to derive lease keys and candidate locations; resolved once at call
/// time instead of being inferred from a live model object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    pub type_name: String,
    pub id: i64,
}

impl OwnerRef {
    pub fn new(type_name: impl Into<String>, id: i64) -> Self {
        Self {
            type_name: type_name.into(),
            id,
        }
    }
}

/// Persisted metadata for one attached file: which backend holds it, where,
/// and which mount point on which owner it belongs to.
///
/// The `(store, path)` pair is only ever written together in a single
/// statement; a row never points at a backend that cannot resolve its path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: i64,
    pub model_type: String,
    pub model_id: i64,
    pub mount_point: String,
    pub path: String,
    pub store: StoreKind,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn owner(&self) -> OwnerRef {
        OwnerRef::new(self.model_type.clone(), self.model_id)
    }

    /// Final segment of the locator; the filename is stable across backends
    /// even though the directory layout differs per store kind.
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Whether this record references file content at all. Records with an
    /// empty path are placeholders and are never migrated.
    pub fn has_file(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Configuration for one attachment slot on a resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountConfig {
    pub mount_point: String,
    /// Type name of the uploader handling this slot, carried in background
    /// job payloads so the runner can dispatch without loading the owner.
    pub uploader_type: String,
}

/// Narrow lookup for mount configuration, keyed by resource type name and
/// mount point name.
pub trait MountRegistry: Send + Sync {
    fn find_mount_config(&self, type_name: &str, mount_point: &str) -> Option<MountConfig>;
}

/// Registry over a fixed set of mounts, built once at startup.
#[derive(Debug, Default)]
pub struct StaticMountRegistry {
    mounts: HashMap<(String, String), MountConfig>,
}

impl StaticMountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        type_name: impl Into<String>,
        mount_point: impl Into<String>,
        uploader_type: impl Into<String>,
    ) -> Self {
        let mount_point = mount_point.into();
        self.mounts.insert(
            (type_name.into(), mount_point.clone()),
            MountConfig {
                mount_point,
                uploader_type: uploader_type.into(),
            },
        );
        self
    }
}

impl MountRegistry for StaticMountRegistry {
    fn find_mount_config(&self, type_name: &str, mount_point: &str) -> Option<MountConfig> {
        self.mounts
            .get(&(type_name.to_string(), mount_point.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> UploadRecord {
        UploadRecord {
            id: 1,
            model_type: "Project".to_string(),
            model_id: 42,
            mount_point: "avatar".to_string(),
            path: path.to_string(),
            store: StoreKind::Local,
            size: 12,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filename_is_last_segment() {
        assert_eq!(record("uploads/project/42/avatar/logo.png").filename(), "logo.png");
        assert_eq!(record("logo.png").filename(), "logo.png");
    }

    #[test]
    fn empty_path_has_no_file() {
        assert!(!record("").has_file());
        assert!(record("uploads/x").has_file());
    }

    #[test]
    fn static_registry_lookup() {
        let registry = StaticMountRegistry::new()
            .register("Project", "avatar", "AvatarUploader")
            .register("Project", "export", "ExportUploader");

        let config = registry.find_mount_config("Project", "avatar").unwrap();
        assert_eq!(config.uploader_type, "AvatarUploader");
        assert!(registry.find_mount_config("Project", "banner").is_none());
        assert!(registry.find_mount_config("Group", "avatar").is_none());
    }
}
