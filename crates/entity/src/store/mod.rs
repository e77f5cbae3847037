//! Entity store trait and implementations.
//!
//! This module defines the [`EntityStore`] trait, the unified interface for
//! the four bulk lookups a collection pass issues against the project
//! database. Every method is batched: it takes a set of keys and returns
//! whatever subset the store knows about, so that resolving any number of
//! folders costs a constant number of round-trips.

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use self::mock::MockStore;
use crate::error::Result;
use crate::models::{EntityId, FolderEntity, ProductEntity, RepresentationEntity, VersionEntity};
use async_trait::async_trait;
use std::collections::HashMap;

/// Unified interface for entity stores.
///
/// All lookups are asynchronous and batched. Keys the store does not know
/// about are simply absent from the result; absence is an expected outcome,
/// never an error. Errors are reserved for the store itself failing
/// (unreachable, malformed data), and implementations must not retry;
/// retry policy belongs to the caller.
///
/// # Examples
///
/// ```
/// use slate_entity::{EntityStore, error::Result};
///
/// async fn folder_exists(store: &dyn EntityStore, project: &str, path: &str) -> Result<bool> {
///     let folders = store.get_folders_by_paths(project, &[path.to_string()]).await?;
///     Ok(!folders.is_empty())
/// }
/// ```
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Name of the configured store. Used for logging only.
    fn name(&self) -> &str;

    /// Resolve folder paths to folder entities in one bulk lookup.
    ///
    /// Paths are compared as opaque case-sensitive strings. Unknown paths
    /// are silently missing from the result.
    async fn get_folders_by_paths(&self, project: &str, paths: &[String]) -> Result<Vec<FolderEntity>>;

    /// Resolve folder ids to the products carrying the given name.
    ///
    /// A well-formed project has at most one product with a given name per
    /// folder, but the store does not enforce that; callers decide the
    /// tie-break when duplicates appear.
    async fn get_products_by_name(
        &self,
        project: &str,
        name: &str,
        folder_ids: &[EntityId],
    ) -> Result<Vec<ProductEntity>>;

    /// Resolve product ids to their single latest version, keyed by product.
    ///
    /// "Latest" is the store's own versioning order (highest version
    /// number). Products without any version are absent from the map.
    async fn get_latest_versions(
        &self,
        project: &str,
        product_ids: &[EntityId],
    ) -> Result<HashMap<EntityId, VersionEntity>>;

    /// Resolve version ids to their representations in one bulk lookup.
    ///
    /// The returned order is stable for a given store so that "first
    /// representation" is a deterministic choice for callers.
    async fn get_representations(
        &self,
        project: &str,
        version_ids: &[EntityId],
    ) -> Result<Vec<RepresentationEntity>>;
}
