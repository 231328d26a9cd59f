//! Re-binding a reloaded attachment to its upload record.
//!
//! A nominal filename is ambiguous between the local and remote namespaces:
//! the same attachment resolves to a different locator per store kind. When
//! the record currently associated with an in-memory attachment does not
//! match any candidate locator for its owner and mount point, the persisted
//! record that does match becomes authoritative.

use stowage_core::models::{OwnerRef, UploadRecord};
use stowage_core::{AppError, UploadPersistence};
use stowage_storage::keys;

/// Resolve the authoritative upload record for an attachment.
///
/// `current` is kept when its path is one of the candidate locators and its
/// owner matches; otherwise the store is consulted. Returns `None` when no
/// persisted record matches either namespace.
pub async fn resolve_upload(
    uploads: &dyn UploadPersistence,
    base_dir: &str,
    owner: &OwnerRef,
    mount_point: &str,
    filename: &str,
    current: Option<&UploadRecord>,
) -> Result<Option<UploadRecord>, AppError> {
    let candidates: Vec<String> = keys::candidate_locations(base_dir, owner, mount_point, filename)
        .into_iter()
        .map(|(_, path)| path)
        .collect();

    if let Some(record) = current {
        if candidates.contains(&record.path)
            && record.model_id == owner.id
            && record.model_type == owner.type_name
        {
            return Ok(Some(record.clone()));
        }
    }

    let found = uploads.find_by_owner_and_paths(owner, &candidates).await?;
    if let Some(ref record) = found {
        tracing::debug!(
            upload_id = record.id,
            path = %record.path,
            store = %record.store,
            "Re-resolved upload record"
        );
    }
    Ok(found)
}
