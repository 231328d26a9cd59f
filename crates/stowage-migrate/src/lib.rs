//! Stowage Migration Library
//!
//! Moves one uploaded file between storage backends while the owning
//! resource stays readable and writable. The [`MigrationCoordinator`] runs
//! one serialized attempt per owner; the [`BackgroundScheduler`] decides
//! which files to offload after a commit; [`resolve_upload`] re-binds a
//! reloaded attachment to its authoritative upload record.

pub mod coordinator;
pub mod error;
pub mod resolve;
pub mod scheduler;

pub use coordinator::MigrationCoordinator;
pub use error::MigrateError;
pub use resolve::resolve_upload;
pub use scheduler::{BackgroundScheduler, MountState};
