//! In-memory entity store for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{EntityId, FolderEntity, ProductEntity, RepresentationEntity, VersionEntity};
use crate::store::EntityStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Fixture {
    folders: Vec<FolderEntity>,
    products: Vec<ProductEntity>,
    versions: Vec<VersionEntity>,
    representations: Vec<RepresentationEntity>,
}

/// In-memory entity store for testing.
///
/// Fixtures are added per project through the `with_*` builder methods, and
/// every trait lookup bumps a query counter so tests can assert on how many
/// round-trips a caller issued. Ideal for unit tests that need an
/// [`EntityStore`] without a database.
///
/// # Examples
///
/// ```
/// use slate_entity::{EntityStore, FolderEntity, store::MockStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MockStore::default()
///     .with_folder("demo", FolderEntity::new("f1", "seq01/sh010"));
///
/// let found = store.get_folders_by_paths("demo", &["seq01/sh010".to_string()]).await?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(store.queries(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockStore {
    name: String,
    projects: HashMap<String, Fixture>,
    queries: AtomicUsize,
    outage_after: usize,
}

impl MockStore {
    /// Change the name of the mock store.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a folder fixture to a project.
    pub fn with_folder(mut self, project: impl Into<String>, folder: FolderEntity) -> Self {
        self.fixture(project).folders.push(folder);
        self
    }

    /// Add a product fixture to a project.
    ///
    /// Panics if the parent folder is not already a fixture. If test setup
    /// is wrong, the test should not pass.
    pub fn with_product(mut self, project: impl Into<String>, product: ProductEntity) -> Self {
        let fixture = self.fixture(project);
        if !fixture.folders.iter().any(|f| f.id == product.folder_id) {
            // The panic here is DELIBERATE. MockStore is intended to be used
            // in tests; panics are expected. There is no error result.
            panic!("MockStore::with_product: unknown folder {}", product.folder_id);
        }
        fixture.products.push(product);
        self
    }

    /// Add a version fixture to a project.
    ///
    /// Panics if the parent product is not already a fixture.
    pub fn with_version(mut self, project: impl Into<String>, version: VersionEntity) -> Self {
        let fixture = self.fixture(project);
        if !fixture.products.iter().any(|p| p.id == version.product_id) {
            panic!("MockStore::with_version: unknown product {}", version.product_id);
        }
        fixture.versions.push(version);
        self
    }

    /// Add a representation fixture to a project.
    ///
    /// Panics if the parent version is not already a fixture.
    pub fn with_representation(mut self, project: impl Into<String>, representation: RepresentationEntity) -> Self {
        let fixture = self.fixture(project);
        if !fixture.versions.iter().any(|v| v.id == representation.version_id) {
            panic!("MockStore::with_representation: unknown version {}", representation.version_id);
        }
        fixture.representations.push(representation);
        self
    }

    /// Make the store fail every lookup after the first `n` succeed.
    ///
    /// Lets tests exercise a store that drops out partway through a pass.
    pub fn with_outage_after(mut self, n: usize) -> Self {
        self.outage_after = n;
        self
    }

    /// Number of bulk lookups issued against this store so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    fn fixture(&mut self, project: impl Into<String>) -> &mut Fixture {
        self.projects.entry(project.into()).or_default()
    }

    fn count(&self, project: &str) -> Result<Option<&Fixture>> {
        let issued = self.queries.fetch_add(1, Ordering::Relaxed);
        if issued >= self.outage_after {
            exn::bail!(ErrorKind::Unavailable("mock".to_string()));
        }
        // Unknown projects behave like empty ones: the query still happened.
        Ok(self.projects.get(project))
    }
}
impl Default for MockStore {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            projects: HashMap::new(),
            queries: AtomicUsize::new(0),
            outage_after: usize::MAX,
        }
    }
}

#[async_trait]
impl EntityStore for MockStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_folders_by_paths(&self, project: &str, paths: &[String]) -> Result<Vec<FolderEntity>> {
        let Some(fixture) = self.count(project)? else {
            return Ok(Vec::new());
        };
        Ok(fixture.folders.iter().filter(|f| paths.contains(&f.path)).cloned().collect())
    }

    async fn get_products_by_name(
        &self,
        project: &str,
        name: &str,
        folder_ids: &[EntityId],
    ) -> Result<Vec<ProductEntity>> {
        let Some(fixture) = self.count(project)? else {
            return Ok(Vec::new());
        };
        Ok(fixture
            .products
            .iter()
            .filter(|p| p.name == name && folder_ids.contains(&p.folder_id))
            .cloned()
            .collect())
    }

    async fn get_latest_versions(
        &self,
        project: &str,
        product_ids: &[EntityId],
    ) -> Result<HashMap<EntityId, VersionEntity>> {
        let Some(fixture) = self.count(project)? else {
            return Ok(HashMap::new());
        };
        let mut latest: HashMap<EntityId, VersionEntity> = HashMap::new();
        for version in fixture.versions.iter().filter(|v| product_ids.contains(&v.product_id)) {
            match latest.entry(version.product_id.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(version.clone());
                },
                Entry::Occupied(mut entry) if version.number > entry.get().number => {
                    entry.insert(version.clone());
                },
                Entry::Occupied(_) => (),
            }
        }
        Ok(latest)
    }

    async fn get_representations(
        &self,
        project: &str,
        version_ids: &[EntityId],
    ) -> Result<Vec<RepresentationEntity>> {
        let Some(fixture) = self.count(project)? else {
            return Ok(Vec::new());
        };
        Ok(fixture.representations.iter().filter(|r| version_ids.contains(&r.version_id)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RepresentationContext;

    fn ids(ids: &[&str]) -> Vec<EntityId> {
        ids.iter().map(|id| EntityId::from(*id)).collect()
    }

    fn sample() -> MockStore {
        MockStore::default()
            .with_folder("demo", FolderEntity::new("f1", "seq01/sh010"))
            .with_product("demo", ProductEntity::new("p1", "f1", "audioMain"))
            .with_version("demo", VersionEntity::new("v1", "p1", 1))
            .with_version("demo", VersionEntity::new("v2", "p1", 2))
            .with_representation(
                "demo",
                RepresentationEntity::new(
                    "r1",
                    "v2",
                    "wav",
                    RepresentationContext::new("sh010", "audioMain", 2, "sh010", "wav"),
                ),
            )
    }

    #[tokio::test]
    async fn test_unknown_project_is_empty_but_counted() {
        let store = sample();
        let folders = store.get_folders_by_paths("other", &["seq01/sh010".to_string()]).await.unwrap();
        assert!(folders.is_empty());
        assert_eq!(store.queries(), 1);
    }

    #[tokio::test]
    async fn test_folders_filter_by_path() {
        let store = sample();
        let folders =
            store.get_folders_by_paths("demo", &["seq01/sh010".to_string(), "seq01/sh020".to_string()]).await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].id, EntityId::from("f1"));
    }

    #[tokio::test]
    async fn test_products_filter_by_name() {
        let store = sample();
        let products = store.get_products_by_name("demo", "audioMain", &ids(&["f1"])).await.unwrap();
        assert_eq!(products.len(), 1);
        let none = store.get_products_by_name("demo", "renderMain", &ids(&["f1"])).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_latest_version_has_highest_number() {
        let store = sample();
        let latest = store.get_latest_versions("demo", &ids(&["p1"])).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[&EntityId::from("p1")].id, EntityId::from("v2"));
        assert_eq!(latest[&EntityId::from("p1")].number, 2);
    }

    #[tokio::test]
    async fn test_representations_by_version() {
        let store = sample();
        // Representations exist under v2 only.
        let repres = store.get_representations("demo", &ids(&["v1"])).await.unwrap();
        assert!(repres.is_empty());
        let repres = store.get_representations("demo", &ids(&["v2"])).await.unwrap();
        assert_eq!(repres.len(), 1);
        assert_eq!(repres[0].name, "wav");
    }

    #[tokio::test]
    async fn test_query_counter_accumulates() {
        let store = sample();
        store.get_folders_by_paths("demo", &[]).await.unwrap();
        store.get_products_by_name("demo", "audioMain", &[]).await.unwrap();
        store.get_latest_versions("demo", &[]).await.unwrap();
        store.get_representations("demo", &[]).await.unwrap();
        assert_eq!(store.queries(), 4);
    }

    #[tokio::test]
    async fn test_outage_fails_lookups_past_the_threshold() {
        let store = sample().with_outage_after(1);
        // The first lookup still answers from the fixtures.
        let folders = store.get_folders_by_paths("demo", &["seq01/sh010".to_string()]).await.unwrap();
        assert_eq!(folders.len(), 1);

        let err = store.get_products_by_name("demo", "audioMain", &ids(&["f1"])).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Unavailable(_)));
        assert!(err.is_retryable());
        // Failed lookups still count as issued.
        assert_eq!(store.queries(), 2);
    }

    #[test]
    #[should_panic(expected = "unknown folder")]
    fn test_with_product_panics_on_unknown_folder() {
        MockStore::default().with_product("demo", ProductEntity::new("p1", "nope", "audioMain"));
    }

    #[test]
    #[should_panic(expected = "unknown product")]
    fn test_with_version_panics_on_unknown_product() {
        MockStore::default()
            .with_folder("demo", FolderEntity::new("f1", "seq01/sh010"))
            .with_version("demo", VersionEntity::new("v1", "nope", 1));
    }
}
