//! Upload metadata repository: CRUD for the uploads table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use stowage_core::models::{OwnerRef, UploadRecord};
use stowage_core::{AppError, StoreKind, UploadPersistence};

/// Row type for the uploads table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct UploadRow {
    pub id: i64,
    pub model_type: String,
    pub model_id: i64,
    pub mount_point: String,
    pub path: String,
    pub store: StoreKind,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

impl UploadRow {
    pub fn into_record(self) -> UploadRecord {
        UploadRecord {
            id: self.id,
            model_type: self.model_type,
            model_id: self.model_id,
            mount_point: self.mount_point,
            path: self.path,
            store: self.store,
            size: self.size,
            created_at: self.created_at,
        }
    }
}

/// Repository for the uploads table.
#[derive(Clone)]
pub struct UploadRepository {
    pool: PgPool,
}

impl UploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the record for a freshly attached file and return it.
    #[tracing::instrument(skip(self), fields(db.table = "uploads"))]
    pub async fn create(
        &self,
        owner: &OwnerRef,
        mount_point: &str,
        path: &str,
        store: StoreKind,
        size: i64,
    ) -> Result<UploadRecord, AppError> {
        let row: UploadRow = sqlx::query_as::<Postgres, UploadRow>(
            r#"
            INSERT INTO uploads (model_type, model_id, mount_point, path, store, size)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, model_type, model_id, mount_point, path, store, size, created_at
            "#,
        )
        .bind(&owner.type_name)
        .bind(owner.id)
        .bind(mount_point)
        .bind(path)
        .bind(store)
        .bind(size)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into_record())
    }

    /// Fetch an upload by id.
    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.record_id = %id))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<UploadRecord>, AppError> {
        let row: Option<UploadRow> = sqlx::query_as::<Postgres, UploadRow>(
            r#"
            SELECT id, model_type, model_id, mount_point, path, store, size, created_at
            FROM uploads WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_record()))
    }

    /// Write the `(store, path)` pair in one statement and return the
    /// updated record. The pair is never written independently; readers see
    /// either the old pair or the new one.
    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.record_id = %id))]
    pub async fn update_location(
        &self,
        id: i64,
        store: StoreKind,
        path: &str,
    ) -> Result<UploadRecord, AppError> {
        let row: Option<UploadRow> = sqlx::query_as::<Postgres, UploadRow>(
            r#"
            UPDATE uploads
            SET store = $2, path = $3
            WHERE id = $1
            RETURNING id, model_type, model_id, mount_point, path, store, size, created_at
            "#,
        )
        .bind(id)
        .bind(store)
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_record())
            .ok_or_else(|| AppError::NotFound(format!("upload {} does not exist", id)))
    }

    /// Find the upload owned by `owner` whose path is one of `paths`.
    #[tracing::instrument(skip(self, paths), fields(db.table = "uploads", count = paths.len()))]
    pub async fn find_by_owner_and_paths(
        &self,
        owner: &OwnerRef,
        paths: &[String],
    ) -> Result<Option<UploadRecord>, AppError> {
        if paths.is_empty() {
            return Ok(None);
        }
        let row: Option<UploadRow> = sqlx::query_as::<Postgres, UploadRow>(
            r#"
            SELECT id, model_type, model_id, mount_point, path, store, size, created_at
            FROM uploads
            WHERE model_type = $1 AND model_id = $2 AND path = ANY($3)
            "#,
        )
        .bind(&owner.type_name)
        .bind(owner.id)
        .bind(paths)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_record()))
    }

    /// Delete one upload row.
    #[tracing::instrument(skip(self), fields(db.table = "uploads", db.record_id = %id))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM uploads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every upload attached to `owner`; used when the owning
    /// resource itself is destroyed. Returns the number of rows removed.
    #[tracing::instrument(skip(self), fields(db.table = "uploads"))]
    pub async fn delete_for_owner(&self, owner: &OwnerRef) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM uploads WHERE model_type = $1 AND model_id = $2")
            .bind(&owner.type_name)
            .bind(owner.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UploadPersistence for UploadRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<UploadRecord>, AppError> {
        self.find_by_id(id).await
    }

    async fn persist_location(
        &self,
        id: i64,
        store: StoreKind,
        path: &str,
    ) -> Result<UploadRecord, AppError> {
        self.update_location(id, store, path).await
    }

    async fn find_by_owner_and_paths(
        &self,
        owner: &OwnerRef,
        candidates: &[String],
    ) -> Result<Option<UploadRecord>, AppError> {
        UploadRepository::find_by_owner_and_paths(self, owner, candidates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_maps_to_record() {
        let row = UploadRow {
            id: 7,
            model_type: "Project".to_string(),
            model_id: 42,
            mount_point: "avatar".to_string(),
            path: "uploads/project/42/avatar/logo.png".to_string(),
            store: StoreKind::Local,
            size: 2048,
            created_at: Utc::now(),
        };

        let record = row.into_record();
        assert_eq!(record.id, 7);
        assert_eq!(record.owner(), OwnerRef::new("Project", 42));
        assert_eq!(record.filename(), "logo.png");
        assert_eq!(record.store, StoreKind::Local);
    }
}
