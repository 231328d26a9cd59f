//! Storage abstraction trait
//!
//! This module defines the Storage trait that both backends implement, and
//! the error taxonomy storage operations surface.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use stowage_core::store_kind::UnknownStoreKind;
use stowage_core::StoreKind;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Store failed: {0}")]
    StoreFailed(String),

    #[error("Retrieve failed: {0}")]
    RetrieveFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Object storage is not enabled")]
    ObjectStoreUnavailable,

    #[error(transparent)]
    UnknownStoreKind(#[from] UnknownStoreKind),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Uniform capability set over the two backends.
///
/// The migration coordinator works entirely through this trait, so moving a
/// file between backends never couples to filesystem or object-store
/// specifics.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` at `key` and return the canonical locator for it.
    async fn store(&self, key: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Read the full content at `key`.
    async fn retrieve(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Read the content at `key` as a chunk stream, for files that should
    /// not be buffered whole.
    async fn retrieve_stream(
        &self,
        key: &str,
    ) -> StorageResult<Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>>;

    /// Remove the object at `key`. Deleting a missing object is not an
    /// error; migration cleanup may race with other removals.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// The store kind this backend serves.
    fn kind(&self) -> StoreKind;
}
