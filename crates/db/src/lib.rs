//! SQLite-backed entity store.
//!
//! This crate keeps a local snapshot of the project entity hierarchy
//! (folders, products, versions, representations) in a SQLite file and
//! serves it through the [`slate_entity::EntityStore`] trait. The database
//! is not the source of truth - the upstream project database is. If the
//! file is deleted, it can be rebuilt by re-syncing.
//!
//! # Architecture
//! - [`Database`] owns the connection pool, applies PRAGMAs, and runs the
//!   embedded migrations on connect.
//! - [`SqliteStore`] is the store itself: the four bulk lookups on the read
//!   side, the `upsert_*` sync methods on the write side.
//!
//! Bulk lookups bind their key sets as one JSON-array parameter each and
//! unpack them with `json_each`, so a lookup is always a single statement
//! no matter how many keys are involved.

mod db;
pub mod error;
mod models;
mod store;

pub use crate::db::Database;
pub use crate::store::SqliteStore;
