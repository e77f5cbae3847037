//! Entity-store data model and client interface.
//!
//! The entity store is the project database a publishing pipeline runs
//! against. It holds the project hierarchy as four entity types:
//! - **Folders**: hierarchical containers (shots, assets), addressed by path.
//! - **Products**: named, versioned deliverables belonging to one folder.
//! - **Versions**: immutable snapshots of a product.
//! - **Representations**: concrete file variants of a version, carrying the
//!   context needed to format their published path.
//!
//! This crate owns the entity structs and the [`EntityStore`] trait; actual
//! stores (SQLite, in-memory mock) live behind that trait.

pub mod error;
mod models;
pub mod store;

pub use crate::models::{
    EntityId, FolderEntity, ProductEntity, RepresentationContext, RepresentationEntity, VersionEntity,
};
pub use crate::store::EntityStore;
use std::sync::Arc;

pub type StoreHandle = Arc<dyn EntityStore + Send + Sync>;
