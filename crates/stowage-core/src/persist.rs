//! Persistence seam for upload metadata.
//!
//! The coordinator and resolver talk to upload rows through this trait so
//! they can run against Postgres in production and an in-memory map in
//! tests. stowage-db implements it for `UploadRepository`.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{OwnerRef, UploadRecord};
use crate::store_kind::StoreKind;

#[async_trait]
pub trait UploadPersistence: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<UploadRecord>, AppError>;

    /// Write the `(store, path)` pair for one record as a single atomic
    /// update and return the updated record. Fails with `NotFound` when the
    /// record no longer exists; the pair is never written independently.
    async fn persist_location(
        &self,
        id: i64,
        store: StoreKind,
        path: &str,
    ) -> Result<UploadRecord, AppError>;

    /// Look up the record owned by `owner` whose path is one of
    /// `candidates`. Used to re-bind a reloaded attachment whose nominal
    /// path is ambiguous between the local and remote namespaces.
    async fn find_by_owner_and_paths(
        &self,
        owner: &OwnerRef,
        candidates: &[String],
    ) -> Result<Option<UploadRecord>, AppError>;
}
