//! Stowage Database Library
//!
//! Postgres repositories backing the core trait seams: upload metadata,
//! migration leases, and the migration job hand-off table.

pub mod db;

pub use db::{MigrationJobRepository, PgLeaseStore, UploadRepository};
