//! Configuration module
//!
//! Environment-driven configuration for the storage backends, the lease, and
//! the database connection. `from_env` reads everything with defaults;
//! `validate` catches combinations that cannot work (remote enabled without
//! a bucket, background upload without remote) before any backend is built.

use std::env;
use std::time::Duration;

/// Default lease TTL for one migration attempt. Long enough for a large
/// transfer, short enough that a crashed holder does not wedge the upload
/// for the rest of the day.
const DEFAULT_LEASE_TIMEOUT_SECS: u64 = 3600;

const DEFAULT_LOCAL_STORAGE_PATH: &str = "/var/lib/stowage/uploads";
const DEFAULT_LOCAL_BASE_DIR: &str = "uploads";

/// Remote object store settings: availability switches plus the connection
/// credential map.
#[derive(Clone, Debug, Default)]
pub struct ObjectStoreConfig {
    /// Object store support is available at all.
    pub enabled: bool,
    /// Automatically offload eligible local files after a commit.
    pub background_upload: bool,
    /// Serving mode flag, consumed by download code outside this subsystem.
    pub proxy_download: bool,
    /// Bucket / container name.
    pub remote_directory: String,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces, ...).
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Local filesystem settings.
#[derive(Clone, Debug)]
pub struct LocalStoreConfig {
    /// Filesystem root the local backend resolves keys under.
    pub storage_path: String,
    /// Logical prefix local locators carry, distinguishing the local
    /// namespace from remote object keys.
    pub base_dir: String,
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            storage_path: DEFAULT_LOCAL_STORAGE_PATH.to_string(),
            base_dir: DEFAULT_LOCAL_BASE_DIR.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub object_store: ObjectStoreConfig,
    pub local_store: LocalStoreConfig,
    pub lease_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let object_store = ObjectStoreConfig {
            enabled: env_bool("STOWAGE_OBJECT_STORE_ENABLED", false),
            background_upload: env_bool("STOWAGE_BACKGROUND_UPLOAD", false),
            proxy_download: env_bool("STOWAGE_PROXY_DOWNLOAD", false),
            remote_directory: env::var("STOWAGE_REMOTE_DIRECTORY").unwrap_or_default(),
            region: env::var("STOWAGE_S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            endpoint: env::var("STOWAGE_S3_ENDPOINT").ok(),
            access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
        };

        let local_store = LocalStoreConfig {
            storage_path: env::var("STOWAGE_LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_LOCAL_STORAGE_PATH.to_string()),
            base_dir: env::var("STOWAGE_LOCAL_BASE_DIR")
                .unwrap_or_else(|_| DEFAULT_LOCAL_BASE_DIR.to_string()),
        };

        let config = Config {
            database_url: env::var("DATABASE_URL").unwrap_or_default(),
            object_store,
            local_store,
            lease_timeout_secs: env_u64("STOWAGE_LEASE_TIMEOUT_SECS", DEFAULT_LEASE_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.object_store.enabled && self.object_store.remote_directory.is_empty() {
            anyhow::bail!(
                "STOWAGE_REMOTE_DIRECTORY must be set when the object store is enabled"
            );
        }
        if self.object_store.background_upload && !self.object_store.enabled {
            anyhow::bail!("STOWAGE_BACKGROUND_UPLOAD requires STOWAGE_OBJECT_STORE_ENABLED");
        }
        if self.local_store.storage_path.is_empty() {
            anyhow::bail!("STOWAGE_LOCAL_STORAGE_PATH must not be empty");
        }
        if self.lease_timeout_secs == 0 {
            anyhow::bail!("STOWAGE_LEASE_TIMEOUT_SECS must be positive");
        }
        Ok(())
    }

    pub fn lease_timeout(&self) -> Duration {
        Duration::from_secs(self.lease_timeout_secs)
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "postgres://localhost/stowage".to_string(),
            object_store: ObjectStoreConfig::default(),
            local_store: LocalStoreConfig::default(),
            lease_timeout_secs: DEFAULT_LEASE_TIMEOUT_SECS,
        }
    }

    #[test]
    fn disabled_object_store_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn enabled_object_store_requires_bucket() {
        let mut config = base_config();
        config.object_store.enabled = true;
        assert!(config.validate().is_err());

        config.object_store.remote_directory = "stowage-bucket".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn background_upload_requires_enabled() {
        let mut config = base_config();
        config.object_store.background_upload = true;
        assert!(config.validate().is_err());

        config.object_store.enabled = true;
        config.object_store.remote_directory = "stowage-bucket".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lease_timeout_must_be_positive() {
        let mut config = base_config();
        config.lease_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
