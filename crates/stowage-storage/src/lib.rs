//! Stowage Storage Library
//!
//! Storage backend abstraction and implementations. An upload's content
//! lives behind the [`Storage`] trait in exactly one backend at a time;
//! the [`factory`] hands out the backend matching a record's store kind.
//!
//! # Locator format
//!
//! Locators are backend-relative. Both backends share the dynamic segment
//! `{model_type}/{model_id}/{mount_point}`; local locators carry a base-dir
//! prefix in front of it, remote locators are bare object keys. Locators
//! must not contain `..` or a leading `/`. Layout is centralized in the
//! [`keys`] module so candidate-path resolution stays consistent with what
//! the backends write.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-remote")]
pub mod remote;
pub mod traits;

// Re-export commonly used types
pub use factory::{ConfigStorageFactory, StorageFactory};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-remote")]
pub use remote::RemoteStorage;
pub use stowage_core::StoreKind;
pub use traits::{Storage, StorageError, StorageResult};
