//! Migration extension hooks.
//!
//! Derived-artifact handling (thumbnail versions, scan results) can attach
//! here without the coordinator knowing about it. Both hooks run inside the
//! migration's rollback scope: an error aborts the attempt and the original
//! file stays where it was.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::UploadRecord;
use crate::store_kind::StoreKind;

#[async_trait]
pub trait MigrationHooks: Send + Sync {
    /// Runs after the content has been materialized, before anything is
    /// written to the target backend.
    async fn before_migrate(
        &self,
        _record: &UploadRecord,
        _target: StoreKind,
    ) -> Result<(), AppError> {
        Ok(())
    }

    /// Runs immediately before the store call on the target backend.
    async fn before_store(
        &self,
        _record: &UploadRecord,
        _target: StoreKind,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

/// Default hooks: everything is a no-op.
pub struct NoOpMigrationHooks;

#[async_trait]
impl MigrationHooks for NoOpMigrationHooks {}
