//! Batch resolution of each folder's last published audio.
//!
//! Many review instances share a handful of folders, so resolving audio
//! per-instance would fan out into one query chain per instance. This
//! collector instead filters and groups instances first, then walks the
//! entity hierarchy (folders → products → versions → representations) with
//! one bulk lookup per level. That caps a pass at four queries,
//! no matter how many instances are in flight.

use super::Collector;
use crate::context::PublishContext;
use crate::error::{ErrorKind, Result};
use crate::instance::AudioAttachment;
use async_trait::async_trait;
use exn::ResultExt;
use slate_config::CollectAudioSettings;
use slate_entity::{EntityId, RepresentationEntity, StoreHandle};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

/// Well-known name of a folder's audio deliverable product.
pub const DEFAULT_AUDIO_PRODUCT: &str = "audioMain";

/// Collects each folder's latest published audio onto its instances.
///
/// For every folder referenced by an unresolved instance, the latest version
/// of the product named `product_name` is looked up and its first
/// representation is formatted through the context's anatomy. Every instance
/// sharing that folder receives the same single-element attachment list:
/// `[{offset: 0, filename: <resolved path>}]`.
///
/// Folders without the product (or without versions/representations) are an
/// expected outcome: their instances are left untouched and no error is
/// raised. Instances that already carry audio are skipped, so re-running
/// the collector is free.
pub struct CollectAudio {
    product_name: String,
    families: Vec<String>,
}

impl Default for CollectAudio {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_AUDIO_PRODUCT.to_string(),
            families: vec!["review".to_string()],
        }
    }
}

impl CollectAudio {
    /// Create a collector searching for the given product name.
    ///
    /// The name usually comes from project settings; [`Default`] uses the
    /// conventional [`DEFAULT_AUDIO_PRODUCT`].
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            ..Self::default()
        }
    }

    /// Replace the family filter (empty = consider every instance).
    pub fn with_families(mut self, families: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.families = families.into_iter().map(Into::into).collect();
        self
    }

    /// Build the collector from loaded settings.
    ///
    /// Returns `None` when the step is disabled, so callers can drop it
    /// from the collector list instead of running a no-op.
    pub fn from_settings(settings: &CollectAudioSettings) -> Option<Self> {
        settings.enabled.then(|| Self {
            product_name: settings.product_name.clone(),
            families: settings.families.clone(),
        })
    }

    /// Resolve representations of the latest audio version per folder path.
    ///
    /// Four bulk stages, each feeding the next; any stage coming back empty
    /// short-circuits, leaving the remaining folders unresolved. Folders
    /// absent from the returned map simply had nothing to offer.
    #[instrument(skip_all, fields(store = store.name(), product = %self.product_name))]
    async fn query_representations(
        &self,
        store: &StoreHandle,
        project: &str,
        folder_paths: &[String],
    ) -> Result<HashMap<String, Vec<RepresentationEntity>>> {
        let mut output = HashMap::new();

        // Folder paths to folder ids.
        let folders =
            store.get_folders_by_paths(project, folder_paths).await.or_raise(|| ErrorKind::Entity)?;
        let folder_id_by_path: HashMap<String, EntityId> =
            folders.into_iter().map(|folder| (folder.path, folder.id)).collect();
        let folder_ids: Vec<EntityId> = folder_id_by_path.values().cloned().collect();
        if folder_ids.is_empty() {
            return Ok(output);
        }

        // Folder ids to the one product carrying the configured name.
        let products = store
            .get_products_by_name(project, &self.product_name, &folder_ids)
            .await
            .or_raise(|| ErrorKind::Entity)?;
        let mut product_id_by_folder_id: HashMap<EntityId, EntityId> = HashMap::new();
        for product in products {
            match product_id_by_folder_id.entry(product.folder_id) {
                Entry::Vacant(entry) => {
                    entry.insert(product.id);
                },
                Entry::Occupied(entry) => {
                    // The name is expected to be unique per folder. When it
                    // isn't, the first match wins.
                    tracing::warn!(
                        folder = %entry.key(),
                        product = %product.id,
                        "duplicate product name under folder, keeping first match",
                    );
                },
            }
        }
        let product_ids: Vec<EntityId> = product_id_by_folder_id.values().cloned().collect();
        if product_ids.is_empty() {
            return Ok(output);
        }

        // Products to their single latest version.
        let versions =
            store.get_latest_versions(project, &product_ids).await.or_raise(|| ErrorKind::Entity)?;
        let version_id_by_product_id: HashMap<EntityId, EntityId> =
            versions.into_iter().map(|(product_id, version)| (product_id, version.id)).collect();
        let version_ids: Vec<EntityId> = version_id_by_product_id.values().cloned().collect();
        if version_ids.is_empty() {
            return Ok(output);
        }

        // Versions to representations, grouped per version.
        let representations =
            store.get_representations(project, &version_ids).await.or_raise(|| ErrorKind::Entity)?;
        let mut repres_by_version_id: HashMap<EntityId, Vec<RepresentationEntity>> = HashMap::new();
        for representation in representations {
            repres_by_version_id.entry(representation.version_id.clone()).or_default().push(representation);
        }
        if repres_by_version_id.is_empty() {
            return Ok(output);
        }

        // Key the per-version grouping back onto the folder paths it came
        // from. A version belongs to exactly one product and that product to
        // exactly one folder, so each group is consumed at most once.
        for folder_path in folder_paths {
            let Some(folder_id) = folder_id_by_path.get(folder_path) else { continue };
            let Some(product_id) = product_id_by_folder_id.get(folder_id) else { continue };
            let Some(version_id) = version_id_by_product_id.get(product_id) else { continue };
            let Some(repres) = repres_by_version_id.remove(version_id) else { continue };
            output.insert(folder_path.clone(), repres);
        }
        Ok(output)
    }
}

#[async_trait]
impl Collector for CollectAudio {
    fn label(&self) -> &str {
        "Collect Folder Audio"
    }

    fn families(&self) -> &[String] {
        &self.families
    }

    async fn collect(&self, store: &StoreHandle, ctx: &mut PublishContext) -> Result<()> {
        // Group the instances still lacking audio by folder path. The map is
        // built fresh per run; nothing persists between invocations.
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, instance) in ctx.instances().iter().enumerate() {
            if !instance.in_families(self.families()) {
                continue;
            }
            if instance.has_audio() {
                tracing::debug!(instance = %instance.name, "audio already collected, skipping");
                continue;
            }
            groups.entry(instance.folder_path.clone()).or_default().push(index);
        }
        // Nothing left to resolve: the store is never touched.
        if groups.is_empty() {
            return Ok(());
        }

        let folder_paths: Vec<String> = groups.keys().cloned().collect();
        tracing::debug!(
            product = %self.product_name,
            folders = folder_paths.len(),
            "searching for folder audio",
        );
        let project = ctx.project().to_string();
        let mut repres_by_folder = self.query_representations(store, &project, &folder_paths).await?;

        for (folder_path, indices) in groups {
            let Some(repres) = repres_by_folder.remove(&folder_path) else { continue };
            let Some(repre) = repres.into_iter().next() else { continue };
            let path = ctx.anatomy().resolve_representation(&repre).or_raise(|| ErrorKind::Anatomy)?;
            let attachment = AudioAttachment::new(path);
            for index in indices {
                let instance = &mut ctx.instances_mut()[index];
                instance.audio = Some(vec![attachment.clone()]);
                tracing::debug!(instance = %instance.name, "audio attached");
            }
        }
        Ok(())
    }
}
