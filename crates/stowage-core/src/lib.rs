//! Stowage Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! trait seams shared across all stowage components. An upload attached to an
//! owning resource lives in exactly one of two storage backends (local
//! filesystem, remote object store); the traits defined here let the
//! migration coordinator move it between them without coupling to a concrete
//! lock store, database, or job runner.

pub mod config;
pub mod error;
pub mod hooks;
pub mod lock;
pub mod models;
pub mod persist;
pub mod queue;
pub mod store_kind;

// Re-export commonly used types
pub use config::{Config, LocalStoreConfig, ObjectStoreConfig};
pub use error::AppError;
pub use hooks::{MigrationHooks, NoOpMigrationHooks};
pub use lock::{DistributedLock, InMemoryLock};
pub use persist::UploadPersistence;
pub use queue::JobQueue;
pub use store_kind::{StoreKind, UnknownStoreKind};
