//! Collectors: the enrichment phase of a publishing run.
//!
//! Collectors run in order over one [`PublishContext`], each reading the
//! entity store and annotating the instances it cares about. They are the
//! only actors with write access to the context during the pass.

mod audio;

pub use self::audio::{CollectAudio, DEFAULT_AUDIO_PRODUCT};
use crate::context::PublishContext;
use crate::error::Result;
use async_trait::async_trait;
use slate_entity::StoreHandle;
use tracing::instrument;

/// A single collection step.
///
/// Implementations must tolerate being run twice over the same context:
/// whatever they attach on the first run they skip on the second.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Human-readable label, used for logging.
    fn label(&self) -> &str;

    /// Instance families this collector concerns itself with. An empty
    /// slice means every instance.
    fn families(&self) -> &[String] {
        &[]
    }

    /// Run this step over the context, annotating instances in place.
    async fn collect(&self, store: &StoreHandle, ctx: &mut PublishContext) -> Result<()>;
}

/// Run collectors in order over the context.
///
/// The first failing collector aborts the run with its error; collectors
/// after it are not started.
#[instrument(skip_all, fields(project = ctx.project()))]
pub async fn run_collectors(
    collectors: &[Box<dyn Collector>],
    store: &StoreHandle,
    ctx: &mut PublishContext,
) -> Result<()> {
    for collector in collectors {
        tracing::info!(label = collector.label(), "running collector");
        collector.collect(store, ctx).await?;
    }
    Ok(())
}
