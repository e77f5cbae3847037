//! Publishing context and collectors.
//!
//! A collection pass owns a [`PublishContext`] (the project's anatomy plus
//! the set of [`Instance`]s queued for publishing) and runs an ordered list
//! of [`Collector`](crate::collect::Collector)s over it. Collectors enrich
//! instances in place; the instances are then handed off to the surrounding
//! pipeline for extraction and integration (not this crate's concern).

pub mod collect;
mod context;
pub mod error;
mod instance;

pub use crate::context::PublishContext;
pub use crate::instance::{AudioAttachment, Instance};
