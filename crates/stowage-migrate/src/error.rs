//! Migration error taxonomy.

use stowage_core::AppError;
use stowage_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    /// Another attempt holds the migration lease for this owner. Callers
    /// should not retry immediately; the holder either finishes or its
    /// lease expires.
    #[error("Migration already running for {key}")]
    AlreadyRunning { key: String },

    /// The metadata write failed after the content write succeeded. The
    /// attempt rolls back in-process and the stored copy is cleaned up.
    #[error("Failed to persist upload location")]
    Persist(#[source] AppError),

    /// Backend failure, including `ObjectStoreUnavailable` and
    /// `UnknownStoreKind` from the factory boundary. Transient I/O
    /// variants are safe to retry from scratch.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Lock-store or lookup infrastructure failure.
    #[error(transparent)]
    App(#[from] AppError),
}

impl MigrateError {
    /// Whether retrying the whole `migrate` call can reasonably succeed
    /// without an intervening configuration or code change.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MigrateError::AlreadyRunning { .. } => false,
            MigrateError::Persist(_) => true,
            MigrateError::Storage(e) => !matches!(
                e,
                StorageError::ObjectStoreUnavailable
                    | StorageError::UnknownStoreKind(_)
                    | StorageError::InvalidKey(_)
                    | StorageError::ConfigError(_)
            ),
            MigrateError::App(e) => e.is_recoverable(),
        }
    }
}
