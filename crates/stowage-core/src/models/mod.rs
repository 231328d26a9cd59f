//! Domain models shared across stowage components.

pub mod job;
pub mod upload;

pub use job::{MigrationJob, JOB_NOTIFY_CHANNEL};
pub use upload::{MountConfig, MountRegistry, OwnerRef, StaticMountRegistry, UploadRecord};
