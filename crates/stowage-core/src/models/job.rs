use serde::{Deserialize, Serialize};

/// Channel name for PostgreSQL LISTEN/NOTIFY when a migration job is
/// enqueued. The external runner may listen here to wake immediately instead
/// of polling.
pub const JOB_NOTIFY_CHANNEL: &str = "stowage_new_migration_job";

/// Payload of one background migration request.
///
/// Opaque to the job runner; field names are part of the payload schema and
/// serialize in camelCase. Exactly one request is enqueued per eligible
/// mount point per owning-resource commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationJob {
    pub resource_type_name: String,
    pub uploader_type_name: String,
    pub mount_point: String,
    pub upload_record_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_schema_field_names() {
        let job = MigrationJob {
            resource_type_name: "Project".to_string(),
            uploader_type_name: "AvatarUploader".to_string(),
            mount_point: "avatar".to_string(),
            upload_record_id: 17,
        };

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["resourceTypeName"], "Project");
        assert_eq!(value["uploaderTypeName"], "AvatarUploader");
        assert_eq!(value["mountPoint"], "avatar");
        assert_eq!(value["uploadRecordId"], 17);

        let back: MigrationJob = serde_json::from_value(value).unwrap();
        assert_eq!(back, job);
    }
}
