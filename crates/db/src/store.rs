//! [`EntityStore`] implementation backed by the snapshot database.

use crate::Database;
use crate::error::{ErrorKind, Result};
use crate::models::{FolderRow, ProductRow, RepresentationRow, VersionRow};
use async_trait::async_trait;
use exn::ResultExt;
use slate_entity::error::{ErrorKind as StoreErrorKind, Result as StoreResult};
use slate_entity::{
    EntityId, EntityStore, FolderEntity, ProductEntity, RepresentationEntity, VersionEntity,
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::instrument;

/// Entity store reading from (and syncing into) a local SQLite snapshot.
///
/// The read side is the [`EntityStore`] trait: the four bulk lookups a
/// collection pass issues. The write side is the `upsert_*` family, used by
/// whatever process mirrors the upstream project database into this one.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}
impl From<&Database> for SqliteStore {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}
impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Encode an IN-list as a JSON array for `json_each` unpacking.
    ///
    /// SQLite caps positional parameters well below what a large project
    /// throws at a bulk lookup; a single JSON-encoded parameter has no such
    /// limit and keeps the statements in `queries/` static.
    fn json_keys<K: AsRef<str>>(keys: &[K]) -> Result<String> {
        let keys: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
        serde_json::to_string(&keys).or_raise(|| ErrorKind::InvalidData("key list"))
    }

    fn json_ids(ids: &[EntityId]) -> Result<String> {
        let ids: Vec<&str> = ids.iter().map(EntityId::as_str).collect();
        serde_json::to_string(&ids).or_raise(|| ErrorKind::InvalidData("id list"))
    }

    /// Classify an internal failure for trait callers.
    ///
    /// Data faults (a row that no longer round-trips) are permanent and must
    /// not be reported as a retryable outage; only query and connection
    /// failures become [`StoreErrorKind::Unavailable`].
    fn classify<T>(result: Result<T>) -> StoreResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                let kind = match &*err {
                    ErrorKind::InvalidData(field) => StoreErrorKind::InvalidData(*field),
                    ErrorKind::Database | ErrorKind::Migration => {
                        StoreErrorKind::Unavailable("sqlite".to_string())
                    },
                };
                Err(err).or_raise(|| kind)
            },
        }
    }

    // =========================================================================
    // Sync (write side)
    // =========================================================================

    /// Insert or update a folder.
    pub async fn upsert_folder(&self, project: &str, folder: &FolderEntity) -> Result<()> {
        let row = FolderRow::from(folder);
        sqlx::query(include_str!("../queries/upsert_folder.sql"))
            .bind(project)
            .bind(row.id)
            .bind(row.path)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Insert or update a product. The parent folder must already exist.
    pub async fn upsert_product(&self, project: &str, product: &ProductEntity) -> Result<()> {
        let row = ProductRow::from(product);
        sqlx::query(include_str!("../queries/upsert_product.sql"))
            .bind(project)
            .bind(row.id)
            .bind(row.folder_id)
            .bind(row.name)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Insert or update a version. The parent product must already exist.
    pub async fn upsert_version(&self, project: &str, version: &VersionEntity) -> Result<()> {
        let row = VersionRow::from(version);
        sqlx::query(include_str!("../queries/upsert_version.sql"))
            .bind(project)
            .bind(row.id)
            .bind(row.product_id)
            .bind(row.number)
            .bind(row.created_at)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    /// Insert or update a representation. The parent version must already exist.
    pub async fn upsert_representation(&self, project: &str, repre: &RepresentationEntity) -> Result<()> {
        let row = RepresentationRow::try_from(repre)?;
        sqlx::query(include_str!("../queries/upsert_representation.sql"))
            .bind(project)
            .bind(row.id)
            .bind(row.version_id)
            .bind(row.name)
            .bind(row.context)
            .execute(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(())
    }

    // =========================================================================
    // Lookups (read side)
    // =========================================================================

    async fn folders_by_paths(&self, project: &str, paths: &[String]) -> Result<Vec<FolderEntity>> {
        let rows: Vec<FolderRow> = sqlx::query_as(include_str!("../queries/folders_by_paths.sql"))
            .bind(project)
            .bind(Self::json_keys(paths)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(FolderEntity::from).collect())
    }

    async fn products_by_name(&self, project: &str, name: &str, folder_ids: &[EntityId]) -> Result<Vec<ProductEntity>> {
        let rows: Vec<ProductRow> = sqlx::query_as(include_str!("../queries/products_by_name.sql"))
            .bind(project)
            .bind(name)
            .bind(Self::json_ids(folder_ids)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        Ok(rows.into_iter().map(ProductEntity::from).collect())
    }

    async fn latest_versions(&self, project: &str, product_ids: &[EntityId]) -> Result<HashMap<EntityId, VersionEntity>> {
        let rows: Vec<VersionRow> = sqlx::query_as(include_str!("../queries/latest_versions.sql"))
            .bind(project)
            .bind(Self::json_ids(product_ids)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter()
            .map(|row| {
                let version = VersionEntity::try_from(row)?;
                Ok((version.product_id.clone(), version))
            })
            .collect()
    }

    async fn representations(&self, project: &str, version_ids: &[EntityId]) -> Result<Vec<RepresentationEntity>> {
        let rows: Vec<RepresentationRow> = sqlx::query_as(include_str!("../queries/representations_by_versions.sql"))
            .bind(project)
            .bind(Self::json_ids(version_ids)?)
            .fetch_all(&self.pool)
            .await
            .or_raise(|| ErrorKind::Database)?;
        rows.into_iter().map(RepresentationEntity::try_from).collect()
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    #[instrument(skip_all, fields(project = project, keys = paths.len()))]
    async fn get_folders_by_paths(&self, project: &str, paths: &[String]) -> StoreResult<Vec<FolderEntity>> {
        Self::classify(self.folders_by_paths(project, paths).await)
    }

    #[instrument(skip_all, fields(project = project, name = name, keys = folder_ids.len()))]
    async fn get_products_by_name(
        &self,
        project: &str,
        name: &str,
        folder_ids: &[EntityId],
    ) -> StoreResult<Vec<ProductEntity>> {
        Self::classify(self.products_by_name(project, name, folder_ids).await)
    }

    #[instrument(skip_all, fields(project = project, keys = product_ids.len()))]
    async fn get_latest_versions(
        &self,
        project: &str,
        product_ids: &[EntityId],
    ) -> StoreResult<HashMap<EntityId, VersionEntity>> {
        Self::classify(self.latest_versions(project, product_ids).await)
    }

    #[instrument(skip_all, fields(project = project, keys = version_ids.len()))]
    async fn get_representations(
        &self,
        project: &str,
        version_ids: &[EntityId],
    ) -> StoreResult<Vec<RepresentationEntity>> {
        Self::classify(self.representations(project, version_ids).await)
    }
}
