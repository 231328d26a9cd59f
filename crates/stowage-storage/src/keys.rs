//! Shared locator layout for storage backends.
//!
//! Both backends address content through the per-resource dynamic segment
//! `{model_type}/{model_id}/{mount_point}`. Local locators prefix it with
//! the configured base dir; remote locators use it bare as the object key.
//! A nominal filename is therefore ambiguous between the two namespaces,
//! which is why resolution works over the full candidate set.

use stowage_core::models::OwnerRef;
use stowage_core::StoreKind;

/// Per-resource directory segment, shared by every store kind.
pub fn dynamic_segment(owner: &OwnerRef, mount_point: &str) -> String {
    format!(
        "{}/{}/{}",
        owner.type_name.to_lowercase(),
        owner.id,
        mount_point
    )
}

/// Directory a mount point's content lives under for the given store kind.
pub fn store_dir(kind: StoreKind, base_dir: &str, owner: &OwnerRef, mount_point: &str) -> String {
    let segment = dynamic_segment(owner, mount_point);
    match kind {
        StoreKind::Local => format!("{}/{}", base_dir.trim_end_matches('/'), segment),
        StoreKind::Remote => segment,
    }
}

/// Full locator for a file in the given store kind.
pub fn location(
    kind: StoreKind,
    base_dir: &str,
    owner: &OwnerRef,
    mount_point: &str,
    filename: &str,
) -> String {
    format!("{}/{}", store_dir(kind, base_dir, owner, mount_point), filename)
}

/// Candidate locators for `filename` across every store kind, in store-kind
/// order. Resolution checks a record's path against this set.
pub fn candidate_locations(
    base_dir: &str,
    owner: &OwnerRef,
    mount_point: &str,
    filename: &str,
) -> Vec<(StoreKind, String)> {
    [StoreKind::Local, StoreKind::Remote]
        .into_iter()
        .map(|kind| (kind, location(kind, base_dir, owner, mount_point, filename)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerRef {
        OwnerRef::new("Project", 42)
    }

    #[test]
    fn local_and_remote_dirs_differ_only_by_prefix() {
        assert_eq!(
            store_dir(StoreKind::Local, "uploads", &owner(), "avatar"),
            "uploads/project/42/avatar"
        );
        assert_eq!(
            store_dir(StoreKind::Remote, "uploads", &owner(), "avatar"),
            "project/42/avatar"
        );
    }

    #[test]
    fn trailing_slash_on_base_dir_is_ignored() {
        assert_eq!(
            store_dir(StoreKind::Local, "uploads/", &owner(), "avatar"),
            "uploads/project/42/avatar"
        );
    }

    #[test]
    fn candidates_cover_both_namespaces() {
        let candidates = candidate_locations("uploads", &owner(), "avatar", "logo.png");
        assert_eq!(
            candidates,
            vec![
                (StoreKind::Local, "uploads/project/42/avatar/logo.png".to_string()),
                (StoreKind::Remote, "project/42/avatar/logo.png".to_string()),
            ]
        );
    }
}
