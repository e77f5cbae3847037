//! The per-run publishing context.

use crate::instance::Instance;
use slate_anatomy::Anatomy;

/// Everything one collection pass operates on.
///
/// The context owns the instances for the duration of the run: collectors
/// get exclusive mutable access and assign attachments whole, never
/// incrementally, so no other actor can observe a partially-updated
/// instance. Nothing is carried between runs.
pub struct PublishContext {
    anatomy: Anatomy,
    instances: Vec<Instance>,
}

impl PublishContext {
    pub fn new(anatomy: Anatomy, instances: Vec<Instance>) -> Self {
        Self { anatomy, instances }
    }

    /// Project this pass publishes into.
    pub fn project(&self) -> &str {
        self.anatomy.project()
    }

    pub fn anatomy(&self) -> &Anatomy {
        &self.anatomy
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [Instance] {
        &mut self.instances
    }

    /// Consume the context, handing the (possibly enriched) instances to
    /// the next pipeline stage.
    pub fn into_instances(self) -> Vec<Instance> {
        self.instances
    }
}
