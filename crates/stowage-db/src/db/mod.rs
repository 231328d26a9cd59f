//! Database repositories for the data access layer
//!
//! Each repository owns one table and provides the operations the migration
//! subsystem needs; the atomic `(store, path)` update and the lease CAS live
//! here so callers never compose them out of weaker primitives.

pub mod jobs;
pub mod leases;
pub mod uploads;

pub use jobs::MigrationJobRepository;
pub use leases::PgLeaseStore;
pub use uploads::UploadRepository;
