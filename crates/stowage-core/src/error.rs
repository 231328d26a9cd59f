//! Error types module
//!
//! Infrastructure errors shared by the repositories and trait seams. The
//! migration-specific taxonomy (already-running, persist failure, backend
//! passthrough) lives with the coordinator; `AppError` covers the layers
//! underneath it.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so the core models stay usable without a database driver.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::store_kind::UnknownStoreKind;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    UnknownStoreKind(#[from] UnknownStoreKind),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl AppError {
    /// Whether retrying the failed operation can reasonably succeed.
    /// Lock-store and database hiccups are transient; the rest need a code
    /// or configuration change first.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Database(_) | AppError::Internal(_) => true,
            AppError::NotFound(_) | AppError::Config(_) | AppError::UnknownStoreKind(_) => false,
        }
    }
}
